// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    crate::{
        builder::{PackageBuilder, DEFAULT_OUTPUT_DIR},
        config::{process_environment, PackageConfig},
        error::Result,
        tools::SystemTools,
    },
    chrono::Utc,
    clap::{Arg, Command},
    log::{info, LevelFilter},
};

const ABOUT: &str = "\
Build a Debian binary package for a pgx PostgreSQL extension.

The extension must already be built and installed into a staging tree
(e.g. with `cargo pgx package`). This command writes a minimal `debian/`
directory describing the package, runs `dpkg-buildpackage` and moves the
resulting files into an output directory.

# Environment Variables

Package metadata is read from the environment. The following are required:

ARCH
   Debian architecture name, as listed by `dpkg-architecture -L`.
DESCRIPTION
   One-line description of the package.
HOMEPAGE_URL
   URL of the package homepage.
MAINTAINER
   Name and e-mail of the maintainer, e.g. `Jane Doe <jane@example.com>`.
PACKAGE
   Package name.
VERSION
   Package version in the form major.minor.patch.
TREE
   Staging directory. Everything under `$TREE/usr` is packaged into `/usr`.

The following are optional:

DEPENDS
   Comma delimited list of runtime dependencies.
OS_NAME
   Name of the distribution. Defaults to the output of `lsb_release -si`.
OS_RELEASE, OS_VERSION
   Release of the distribution. Defaults to the output of `lsb_release -sr`.
RELEASE_NOTES_URL
   URL referenced by the generated changelog entry.

`pg_config` must be on PATH. It is used to discover the PostgreSQL version
being built for.

The package version is `1:$VERSION~$OS_NAME$OS_RELEASE`.

# Exit Status

0 on success. 2 if required environment variables are missing. 1 on any
other error.
";

pub fn run_cli() -> Result<()> {
    let app = Command::new("pgx-deb")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build Debian packages for pgx PostgreSQL extensions")
        .long_about(ABOUT);

    let app = app.arg(
        Arg::new("verbose")
            .long("verbose")
            .short('v')
            .multiple_occurrences(true)
            .help("Increase logging verbosity. Can be specified multiple times."),
    );

    let app = app
        .arg(
            Arg::new("source_dir")
                .long("source-dir")
                .takes_value(true)
                .default_value(".")
                .allow_invalid_utf8(true)
                .help("Package source directory; receives debian/ and runs dpkg-buildpackage"),
        )
        .arg(
            Arg::new("output_dir")
                .long("output-dir")
                .takes_value(true)
                .default_value(DEFAULT_OUTPUT_DIR)
                .allow_invalid_utf8(true)
                .help("Directory to move built packages into, relative to the source directory"),
        )
        .arg(
            Arg::new("clean")
                .long("clean")
                .help("Remove existing debian/ and output directories before building"),
        )
        .arg(
            Arg::new("no_build")
                .long("no-build")
                .help("Only write debian/; don't run dpkg-buildpackage"),
        );

    let matches = app.get_matches();

    let log_level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level.as_str()),
    );

    // Disable log context except at higher log levels.
    if log_level <= LevelFilter::Info {
        builder
            .format_timestamp(None)
            .format_level(false)
            .format_target(false);
    }

    builder.init();

    let source_dir = matches
        .value_of_os("source_dir")
        .expect("source_dir has a default value");
    let output_dir = matches
        .value_of_os("output_dir")
        .expect("output_dir has a default value");

    let env = process_environment();
    let config = PackageConfig::from_environment(&env, &SystemTools, Utc::now())?;

    info!(
        "packaging {} {} for {}",
        config.package,
        config.changelog_version(),
        config.architecture
    );

    let moved = PackageBuilder::new(&config, source_dir)
        .output_dir(output_dir)
        .clean(matches.is_present("clean"))
        .build_binary(!matches.is_present("no_build"))
        .build(&SystemTools)?;

    if !moved.is_empty() {
        info!("collected {} files", moved.len());
    }

    Ok(())
}
