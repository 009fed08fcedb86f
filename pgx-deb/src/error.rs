// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Error handling. */

use {std::path::PathBuf, thiserror::Error};

/// Primary error type.
#[derive(Debug, Error)]
pub enum PgxDebError {
    #[error("argument parsing error: {0}")]
    Clap(#[from] clap::Error),

    #[error("required environment variables not set: {}", .0.join(", "))]
    MissingEnvironment(Vec<&'static str>),

    #[error("bad format '{0}' of PostgreSQL version")]
    PgVersionFormat(String),

    #[error("error invoking {0}: {1}")]
    ToolInvocation(String, std::io::Error),

    #[error("{0} failed: {1}")]
    ToolExitStatus(String, String),

    #[error("I/O error on path {}: {1}", .0.display())]
    IoPath(PathBuf, std::io::Error),

    #[error("invalid artifact pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("error scanning for build artifacts: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("refusing to remove {}: it contains the source directory", .0.display())]
    PurgeSourceTree(PathBuf),

    #[error("{} has no parent directory to collect artifacts from", .0.display())]
    NoParentDirectory(PathBuf),

    #[error("symbolic links are not supported on this platform")]
    SymlinkUnsupported,
}

impl PgxDebError {
    /// Construct a closure that attaches a path to an [std::io::Error].
    pub fn io_path(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |e| Self::IoPath(path, e)
    }
}

/// Result wrapper for this crate.
pub type Result<T> = std::result::Result<T, PgxDebError>;
