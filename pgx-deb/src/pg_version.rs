// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Discovery of the PostgreSQL version being built against. */

use {
    crate::{
        error::{PgxDebError, Result},
        tools::ExternalTools,
    },
    once_cell::sync::Lazy,
    regex::Regex,
    std::{
        fmt::{Display, Formatter},
        str::FromStr,
    },
};

/// Matches the leading `PostgreSQL <major>.<minor>` of `pg_config --version` output.
static RE_PG_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^PostgreSQL (\d+)\.(\d+)").unwrap());

/// Major and minor version of a PostgreSQL installation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PgVersion {
    pub major: u32,
    pub minor: u32,
}

impl PgVersion {
    /// Parse the output of `pg_config --version`.
    ///
    /// Only the start of the string is examined; anything after the minor
    /// version (build platform, compiler) is ignored.
    pub fn parse(s: &str) -> Result<Self> {
        let format_error = || PgxDebError::PgVersionFormat(s.to_string());

        let caps = RE_PG_VERSION.captures(s).ok_or_else(format_error)?;

        Ok(Self {
            major: u32::from_str(&caps[1]).map_err(|_| format_error())?,
            minor: u32::from_str(&caps[2]).map_err(|_| format_error())?,
        })
    }

    /// Resolve the version of the `pg_config` found on `PATH`.
    pub fn probe(tools: &dyn ExternalTools) -> Result<Self> {
        let output = tools.capture("pg_config", &["--version"])?;

        Self::parse(&output)
    }
}

impl Display for PgVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::testutil::FakeTools, anyhow::Result};

    #[test]
    fn parse_release() -> Result<()> {
        let v = PgVersion::parse("PostgreSQL 15.2 on x86_64-pc-linux-gnu, compiled by gcc")?;
        assert_eq!(v, PgVersion { major: 15, minor: 2 });
        assert_eq!(v.to_string(), "15.2");

        let v = PgVersion::parse("PostgreSQL 12.14 (Ubuntu 12.14-1.pgdg22.04+1)")?;
        assert_eq!(v.major, 12);
        assert_eq!(v.minor, 14);

        Ok(())
    }

    #[test]
    fn parse_rejects_unanchored() {
        for s in [
            "",
            "PostgreSQL",
            "PostgreSQL 16",
            "PostgreSQL 16beta1",
            " PostgreSQL 15.2",
            "PostgreSQL 99999999999.1",
            "PostgreSQL 15.99999999999",
            "sh: 1: pg_config: not found",
        ] {
            let res = PgVersion::parse(s);
            assert!(
                matches!(&res, Err(PgxDebError::PgVersionFormat(v)) if v == s),
                "{:?} should not parse",
                s
            );
        }
    }

    #[test]
    fn format_error_names_input() {
        let err = PgVersion::parse("bogus").unwrap_err();
        assert_eq!(err.to_string(), "bad format 'bogus' of PostgreSQL version");
    }

    #[test]
    fn probe_invokes_pg_config() -> Result<()> {
        let tools = FakeTools::default().with_pg_config("PostgreSQL 14.7");

        assert_eq!(PgVersion::probe(&tools)?, PgVersion { major: 14, minor: 7 });
        assert_eq!(
            tools.invocations(),
            vec!["pg_config --version".to_string()]
        );

        Ok(())
    }
}
