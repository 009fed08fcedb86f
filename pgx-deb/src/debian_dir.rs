// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Content of the `debian/` directory consumed by `dpkg-buildpackage`.

Rendering functions are pure and return file content. Writing to the
filesystem is done separately by [write_file] and [symlink_rules].
*/

use {
    crate::{
        changelog::{Changelog, ChangelogEntry},
        config::PackageConfig,
        control::{ControlParagraph, SourceControl},
        error::{PgxDebError, Result},
    },
    log::debug,
    std::path::Path,
};

/// Name of the directory holding packaging metadata.
pub const DEBIAN_DIR: &str = "debian";

/// Target of the `debian/rules` symlink.
///
/// With debhelper compat levels, `dh` alone is a complete rules file.
pub const DH_PATH: &str = "/usr/bin/dh";

/// Build the `debian/control` file.
pub fn source_control(config: &PackageConfig) -> SourceControl<'_> {
    let mut control = SourceControl::new(
        ControlParagraph::default()
            .with_field("Source", config.package.as_str())
            .with_field("Maintainer", config.maintainer.as_str())
            .with_field("Homepage", config.homepage_url.as_str())
            .with_field("Rules-Requires-Root", "no")
            .with_field("Section", "database")
            .with_field("Priority", "extra")
            .with_field("Build-Depends", "debhelper-compat (= 12)"),
    );

    control.add_binary(
        ControlParagraph::default()
            .with_field("Package", config.package.as_str())
            .with_field("Architecture", config.architecture.as_str())
            .with_field("Depends", config.depends.as_str())
            .with_field("Description", config.description.as_str()),
    );

    control
}

/// Build the `debian/changelog` file.
///
/// It has a single entry for the version being packaged.
pub fn changelog(config: &PackageConfig) -> Changelog<'_> {
    let mut changelog = Changelog::default();
    changelog.add_entry(ChangelogEntry {
        package: config.package.as_str().into(),
        version: config.changelog_version().into(),
        distributions: vec!["unused".into()],
        urgency: "medium".into(),
        changes: vec![format!("See {}", config.release_notes_url).into()],
        maintainer: config.maintainer.as_str().into(),
        date: config.date,
    });

    changelog
}

pub fn render_control(config: &PackageConfig) -> Result<Vec<u8>> {
    let mut buf = vec![];
    source_control(config)
        .write(&mut buf)
        .map_err(PgxDebError::io_path("debian/control"))?;

    Ok(buf)
}

pub fn render_changelog(config: &PackageConfig) -> Result<Vec<u8>> {
    let mut buf = vec![];
    changelog(config)
        .write(&mut buf)
        .map_err(PgxDebError::io_path("debian/changelog"))?;

    Ok(buf)
}

/// Render `debian/install`.
///
/// Installs everything under `$TREE/usr` into `/usr` of the package.
pub fn render_install(config: &PackageConfig) -> Vec<u8> {
    format!("{}/usr/* usr/\n", config.tree).into_bytes()
}

/// Write `data` to `path`, creating or truncating it.
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    debug!("writing {} ({} bytes)", path.display(), data.len());
    std::fs::write(path, data).map_err(PgxDebError::io_path(path))
}

/// Create `debian/rules` as a symlink to `dh`.
///
/// Fails if `debian/rules` already exists.
pub fn symlink_rules(debian_dir: &Path) -> Result<()> {
    let path = debian_dir.join("rules");
    debug!("linking {} to {}", path.display(), DH_PATH);

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(DH_PATH, &path).map_err(PgxDebError::io_path(path))
    }

    #[cfg(not(unix))]
    {
        Err(PgxDebError::SymlinkUnsupported)
    }
}

/// Populate an existing `debian/` directory.
///
/// Files are written in the order `rules`, `control`, `changelog`, `install`.
/// A failure leaves previously written files in place.
pub fn write_debian_dir(debian_dir: &Path, config: &PackageConfig) -> Result<()> {
    symlink_rules(debian_dir)?;
    write_file(&debian_dir.join("control"), &render_control(config)?)?;
    write_file(&debian_dir.join("changelog"), &render_changelog(config)?)?;
    write_file(&debian_dir.join("install"), &render_install(config))?;

    Ok(())
}
