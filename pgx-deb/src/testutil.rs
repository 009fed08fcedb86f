// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    crate::{
        config::{Environment, PackageConfig, DEFAULT_RELEASE_NOTES_URL},
        error::{PgxDebError, Result},
        pg_version::PgVersion,
        tools::ExternalTools,
    },
    chrono::{TimeZone, Utc},
    std::{cell::RefCell, collections::HashMap, path::Path},
};

pub fn temp_dir() -> std::io::Result<tempfile::TempDir> {
    tempfile::Builder::new().prefix("pgx-deb-test").tempdir()
}

/// Environment with every required variable and the distribution set.
pub fn sample_environment() -> Environment {
    [
        ("ARCH", "amd64"),
        ("DESCRIPTION", "Foo extension for PostgreSQL"),
        ("HOMEPAGE_URL", "https://example.com/foo"),
        ("MAINTAINER", "Jane Doe <jane@example.com>"),
        ("PACKAGE", "foo"),
        ("VERSION", "1.2.3"),
        ("TREE", "/build/tree"),
        ("OS_NAME", "ubuntu"),
        ("OS_RELEASE", "2204"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// The config resolved from [sample_environment].
pub fn sample_config() -> PackageConfig {
    PackageConfig {
        package: "foo".into(),
        version: "1.2.3".into(),
        description: "Foo extension for PostgreSQL".into(),
        architecture: "amd64".into(),
        maintainer: "Jane Doe <jane@example.com>".into(),
        homepage_url: "https://example.com/foo".into(),
        depends: "".into(),
        tree: "/build/tree".into(),
        os_name: "ubuntu".into(),
        os_release: "2204".into(),
        release_notes_url: DEFAULT_RELEASE_NOTES_URL.into(),
        date: Utc.with_ymd_and_hms(2022, 11, 13, 14, 5, 9).unwrap(),
        pg_version: PgVersion {
            major: 15,
            minor: 2,
        },
    }
}

/// [ExternalTools] that records invocations instead of running anything.
///
/// `capture()` answers from canned output keyed by the command line. `run()`
/// simulates `dpkg-buildpackage` by creating the registered artifact files in
/// the parent of the working directory.
#[derive(Default)]
pub struct FakeTools {
    outputs: HashMap<String, String>,
    artifacts: Vec<String>,
    fail_run: bool,
    invocations: RefCell<Vec<String>>,
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

impl FakeTools {
    #[must_use]
    pub fn with_output(mut self, command: &str, output: &str) -> Self {
        self.outputs.insert(command.to_string(), output.to_string());
        self
    }

    #[must_use]
    pub fn with_pg_config(self, output: &str) -> Self {
        self.with_output("pg_config --version", output)
    }

    #[must_use]
    pub fn with_artifacts(mut self, names: &[&str]) -> Self {
        self.artifacts
            .extend(names.iter().map(|name| name.to_string()));
        self
    }

    #[must_use]
    pub fn failing_run(mut self) -> Self {
        self.fail_run = true;
        self
    }

    /// Command lines seen so far, in order.
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.borrow().clone()
    }
}

impl ExternalTools for FakeTools {
    fn capture(&self, program: &str, args: &[&str]) -> Result<String> {
        let line = command_line(program, args);
        self.invocations.borrow_mut().push(line.clone());

        self.outputs.get(&line).cloned().ok_or_else(|| {
            PgxDebError::ToolInvocation(
                program.to_string(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no canned output"),
            )
        })
    }

    fn run(&self, program: &str, args: &[&str], dir: &Path) -> Result<()> {
        self.invocations
            .borrow_mut()
            .push(command_line(program, args));

        if self.fail_run {
            return Err(PgxDebError::ToolExitStatus(
                program.to_string(),
                "exit status: 2".to_string(),
            ));
        }

        if let Some(parent) = dir.parent() {
            for name in &self.artifacts {
                let path = parent.join(name);
                std::fs::write(&path, name.as_bytes()).map_err(PgxDebError::io_path(path))?;
            }
        }

        Ok(())
    }
}
