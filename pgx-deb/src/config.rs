// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Package configuration resolved from environment variables.

Packaging is driven by environment variables, typically set by a CI job.
The following are required:

`ARCH`
   Debian architecture name. Must be a value known to `dpkg-architecture -L`.
`DESCRIPTION`
   One-line package description.
`HOMEPAGE_URL`
   Homepage of the package.
`MAINTAINER`
   Maintainer name and e-mail, as `Name <email>`.
`PACKAGE`
   Name of the source and binary package.
`VERSION`
   Upstream version, as `major.minor.patch`.
`TREE`
   Staging directory containing the built `usr/` hierarchy.

The following are optional:

`DEPENDS`
   Comma delimited runtime dependencies. Defaults to none.
`OS_NAME`
   Distribution id. Defaults to the output of `lsb_release -si`.
`OS_RELEASE` (or `OS_VERSION`)
   Distribution release. Defaults to the output of `lsb_release -sr`.
`RELEASE_NOTES_URL`
   URL the changelog entry points at.
*/

use {
    crate::{
        error::{PgxDebError, Result},
        pg_version::PgVersion,
        tools::ExternalTools,
    },
    chrono::{DateTime, Utc},
    log::info,
    std::collections::BTreeMap,
};

/// Environment variables that must be present and non-empty.
pub const REQUIRED_VARIABLES: &[&str] = &[
    "ARCH",
    "DESCRIPTION",
    "HOMEPAGE_URL",
    "MAINTAINER",
    "PACKAGE",
    "VERSION",
    "TREE",
];

/// Epoch prefixed to every Debian version we produce.
pub const DEB_EPOCH: u32 = 1;

pub const DEFAULT_RELEASE_NOTES_URL: &str =
    "https://github.com/timescale/timescaledb-toolkit/releases";

/// A snapshot of environment variables.
pub type Environment = BTreeMap<String, String>;

/// Capture the environment of the current process.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn process_environment() -> Environment {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Names of required variables that are unset or empty, in declaration order.
pub fn missing_variables(env: &Environment) -> Vec<&'static str> {
    REQUIRED_VARIABLES
        .iter()
        .filter(|name| env.get(**name).map_or(true, |v| v.is_empty()))
        .copied()
        .collect()
}

/// Obtain a non-empty variable value.
fn non_empty<'a>(env: &'a Environment, name: &str) -> Option<&'a str> {
    env.get(name).map(|v| v.as_str()).filter(|v| !v.is_empty())
}

/// Everything needed to write the `debian/` directory for one package.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackageConfig {
    pub package: String,
    pub version: String,
    pub description: String,
    pub architecture: String,
    pub maintainer: String,
    pub homepage_url: String,
    pub depends: String,
    pub tree: String,
    pub os_name: String,
    pub os_release: String,
    pub release_notes_url: String,
    pub date: DateTime<Utc>,
    pub pg_version: PgVersion,
}

impl PackageConfig {
    /// Resolve configuration from environment variables.
    ///
    /// Required variables are checked before anything else happens. Missing
    /// ones are reported together via [PgxDebError::MissingEnvironment] and no
    /// external tool is invoked.
    ///
    /// `lsb_release` is consulted for distribution values not present in
    /// `env` and `pg_config` is always consulted for the PostgreSQL version.
    pub fn from_environment(
        env: &Environment,
        tools: &dyn ExternalTools,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let missing = missing_variables(env);
        if !missing.is_empty() {
            return Err(PgxDebError::MissingEnvironment(missing));
        }

        // Presence was validated above.
        let required = |name: &str| env[name].clone();

        // Values given in the environment are used as is. Only lsb_release
        // output is normalized.
        let os_name = match non_empty(env, "OS_NAME") {
            Some(v) => v.to_string(),
            None => tools.capture("lsb_release", &["-si"])?.trim().to_lowercase(),
        };

        let os_release = non_empty(env, "OS_RELEASE").or_else(|| non_empty(env, "OS_VERSION"));
        let os_release = match os_release {
            Some(v) => v.to_string(),
            None => tools.capture("lsb_release", &["-sr"])?.trim().to_lowercase(),
        };

        let pg_version = PgVersion::probe(tools)?;
        info!("building for PostgreSQL {}", pg_version);

        Ok(Self {
            package: required("PACKAGE"),
            version: required("VERSION"),
            description: required("DESCRIPTION"),
            architecture: required("ARCH"),
            maintainer: required("MAINTAINER"),
            homepage_url: required("HOMEPAGE_URL"),
            depends: non_empty(env, "DEPENDS").unwrap_or_default().to_string(),
            tree: required("TREE"),
            os_name,
            os_release,
            release_notes_url: non_empty(env, "RELEASE_NOTES_URL")
                .unwrap_or(DEFAULT_RELEASE_NOTES_URL)
                .to_string(),
            date: now,
            pg_version,
        })
    }

    /// The Debian version string, without epoch.
    ///
    /// This is the upstream version suffixed with the distribution so packages
    /// built for different releases don't collide in a repository.
    pub fn deb_version(&self) -> String {
        format!("{}~{}{}", self.version, self.os_name, self.os_release)
    }

    /// The full version recorded in `debian/changelog`.
    pub fn changelog_version(&self) -> String {
        format!("{}:{}", DEB_EPOCH, self.deb_version())
    }
}
