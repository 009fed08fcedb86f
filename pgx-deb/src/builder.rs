// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Driving `dpkg-buildpackage` to produce a binary package. */

use {
    crate::{
        config::PackageConfig,
        debian_dir::{write_debian_dir, DEBIAN_DIR},
        error::{PgxDebError, Result},
        tools::ExternalTools,
    },
    log::{info, warn},
    std::path::{Path, PathBuf},
};

/// Default name of the directory receiving built packages.
pub const DEFAULT_OUTPUT_DIR: &str = "_packages";

/// Arguments passed to `dpkg-buildpackage`.
pub const DPKG_BUILDPACKAGE_ARGS: &[&str] = &["--build=binary", "--no-sign", "--post-clean"];

/// Builds a Debian binary package from a source directory.
///
/// The source directory is where `debian/` is written and where
/// `dpkg-buildpackage` runs. `dpkg-buildpackage` writes its results to the
/// parent of the source directory, from where they are moved into the output
/// directory.
///
/// Every step fails if its target already exists and nothing is rolled back
/// on failure, unless [Self::clean] is enabled, in which case existing
/// `debian/` and output directories are removed first.
#[derive(Clone, Debug)]
pub struct PackageBuilder<'a> {
    config: &'a PackageConfig,
    source_dir: PathBuf,
    output_dir: PathBuf,
    clean: bool,
    build_binary: bool,
}

impl<'a> PackageBuilder<'a> {
    /// Create a new builder for a package rooted at `source_dir`.
    pub fn new(config: &'a PackageConfig, source_dir: impl AsRef<Path>) -> Self {
        Self {
            config,
            source_dir: source_dir.as_ref().to_path_buf(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            clean: false,
            build_binary: true,
        }
    }

    /// Set the directory receiving built packages.
    ///
    /// Relative paths are resolved against the source directory.
    #[must_use]
    pub fn output_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Remove existing `debian/` and output directories before building.
    #[must_use]
    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Whether to invoke `dpkg-buildpackage` after writing `debian/`.
    #[must_use]
    pub fn build_binary(mut self, build: bool) -> Self {
        self.build_binary = build;
        self
    }

    /// Path to the `debian/` directory.
    pub fn debian_dir(&self) -> PathBuf {
        self.source_dir.join(DEBIAN_DIR)
    }

    /// Resolved path of the output directory.
    pub fn output_path(&self) -> PathBuf {
        self.source_dir.join(&self.output_dir)
    }

    /// Run all packaging steps.
    ///
    /// This will perform the following actions:
    ///
    /// 1. Create `debian/` and write `rules`, `control`, `changelog` and `install`.
    /// 2. Invoke `dpkg-buildpackage`.
    /// 3. Create the output directory and move artifacts into it.
    ///
    /// Returns the paths of moved artifacts.
    pub fn build(&self, tools: &dyn ExternalTools) -> Result<Vec<PathBuf>> {
        let source_dir = std::fs::canonicalize(&self.source_dir)
            .map_err(PgxDebError::io_path(&self.source_dir))?;
        let debian_dir = source_dir.join(DEBIAN_DIR);
        let output_path = source_dir.join(&self.output_dir);

        if self.clean {
            purge(&debian_dir)?;
            purge_output(&output_path, &source_dir)?;
        }

        info!("writing {}", debian_dir.display());
        std::fs::create_dir(&debian_dir).map_err(PgxDebError::io_path(&debian_dir))?;
        write_debian_dir(&debian_dir, self.config)?;

        if !self.build_binary {
            return Ok(vec![]);
        }

        tools.run("dpkg-buildpackage", DPKG_BUILDPACKAGE_ARGS, &source_dir)?;

        let search_dir = source_dir
            .parent()
            .ok_or_else(|| PgxDebError::NoParentDirectory(source_dir.clone()))?;

        collect_artifacts(
            search_dir,
            &self.config.package,
            &output_path,
            &[source_dir.as_path()],
        )
    }
}

fn purge(path: &Path) -> Result<()> {
    if path.exists() {
        warn!("purging {}", path.display());
        remove_dir_all::remove_dir_all(path).map_err(PgxDebError::io_path(path))?;
    }

    Ok(())
}

/// Remove the output directory unless it is the source directory or one of
/// its ancestors.
///
/// The check is made on the canonical path so `.`, `..` and symlinks can't
/// bypass it. The parent of the source directory, where `dpkg-buildpackage`
/// leaves its results, is an ancestor and so is covered as well.
fn purge_output(path: &Path, source_dir: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let canonical = std::fs::canonicalize(path).map_err(PgxDebError::io_path(path))?;
    if source_dir.starts_with(&canonical) {
        return Err(PgxDebError::PurgeSourceTree(canonical));
    }

    purge(&canonical)
}

/// Move a file, falling back to copy and delete when renaming is not possible.
fn move_path(from: &Path, to: &Path) -> Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }

    // rename() does not cross filesystems.
    std::fs::copy(from, to).map_err(PgxDebError::io_path(to))?;
    std::fs::remove_file(from).map_err(PgxDebError::io_path(from))
}

/// Move entries of `search_dir` whose name starts with `package` into `dest_dir`.
///
/// `dest_dir` is created and must not already exist. Paths in `exclude` (and
/// `dest_dir` itself) are never moved. Excluded paths are compared as given,
/// so they should be canonical like `search_dir`.
pub fn collect_artifacts(
    search_dir: &Path,
    package: &str,
    dest_dir: &Path,
    exclude: &[&Path],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir(dest_dir).map_err(PgxDebError::io_path(dest_dir))?;
    // Resolve `..` so an output directory next to the source directory is
    // recognized when the glob matches it.
    let dest_dir = std::fs::canonicalize(dest_dir).map_err(PgxDebError::io_path(dest_dir))?;
    let dest_dir = dest_dir.as_path();

    let pattern = format!(
        "{}/{}*",
        glob::Pattern::escape(&search_dir.display().to_string()),
        glob::Pattern::escape(package)
    );

    let mut moved = vec![];

    for path in glob::glob(&pattern)? {
        let path = path?;

        if path == dest_dir || exclude.iter().any(|p| *p == path) {
            warn!("not moving {}", path.display());
            continue;
        }

        let file_name = match path.file_name() {
            Some(name) => name,
            None => continue,
        };
        let dest = dest_dir.join(file_name);

        println!("Moving {} to {}", path.display(), dest_dir.display());
        move_path(&path, &dest)?;
        moved.push(dest);
    }

    Ok(moved)
}
