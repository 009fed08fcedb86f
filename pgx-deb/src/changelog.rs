// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Defines types representing debian/changelog files.

See https://www.debian.org/doc/debian-policy/ch-source.html#debian-changelog-debian-changelog
for the specification.
*/

use {
    chrono::{DateTime, Utc},
    std::{borrow::Cow, io::Write},
};

/// Trailer date format, identical to `date -R`.
///
/// The day of month is always two digits.
pub const CHANGELOG_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

#[derive(Clone, Debug)]
pub struct ChangelogEntry<'a> {
    pub package: Cow<'a, str>,
    pub version: Cow<'a, str>,
    pub distributions: Vec<Cow<'a, str>>,
    pub urgency: Cow<'a, str>,
    /// Change bullets, written as `  * <change>`.
    pub changes: Vec<Cow<'a, str>>,
    /// Maintainer as `Name <email>`.
    pub maintainer: Cow<'a, str>,
    pub date: DateTime<Utc>,
}

impl<'a> ChangelogEntry<'a> {
    /// Serialize the changelog entry to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        /*
        package (version) distribution(s); urgency=urgency

          * change details

         -- maintainer name <email address>[two spaces]  date
        */
        writeln!(
            writer,
            "{} ({}) {}; urgency={}",
            self.package,
            self.version,
            self.distributions.join(" "),
            self.urgency
        )?;
        writer.write_all(b"\n")?;
        for change in &self.changes {
            writeln!(writer, "  * {}", change)?;
        }
        writer.write_all(b"\n")?;
        writeln!(
            writer,
            " -- {}  {}",
            self.maintainer,
            self.date.format(CHANGELOG_DATE_FORMAT)
        )
    }
}

/// Represents a complete `debian/changelog` file.
///
/// Changelogs are an ordered series of `ChangelogEntry` items, newest first.
#[derive(Default)]
pub struct Changelog<'a> {
    entries: Vec<ChangelogEntry<'a>>,
}

impl<'a> Changelog<'a> {
    /// Add an entry to this changelog.
    pub fn add_entry<'b: 'a>(&mut self, entry: ChangelogEntry<'b>) {
        self.entries.push(entry)
    }

    /// Serialize the changelog to a writer.
    ///
    /// Entries are separated by a blank line.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writer.write_all(b"\n")?;
            }
            entry.write(writer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, anyhow::Result, chrono::TimeZone};

    fn entry(version: &str) -> ChangelogEntry<'static> {
        ChangelogEntry {
            package: "mypackage".into(),
            version: version.to_string().into(),
            distributions: vec!["unused".into()],
            urgency: "medium".into(),
            changes: vec!["details".into()],
            maintainer: "maintainer <me@example.com>".into(),
            date: Utc.timestamp_opt(1420000000, 0).unwrap(),
        }
    }

    #[test]
    fn test_write() -> Result<()> {
        let mut changelog = Changelog::default();
        changelog.add_entry(entry("1:0.1"));

        let mut buf = vec![];
        changelog.write(&mut buf)?;

        let s = String::from_utf8(buf)?;
        assert_eq!(s, "mypackage (1:0.1) unused; urgency=medium\n\n  * details\n\n -- maintainer <me@example.com>  Wed, 31 Dec 2014 04:26:40 +0000\n");

        Ok(())
    }

    #[test]
    fn test_date_day_zero_padded() -> Result<()> {
        let mut entry = entry("0.1");
        entry.date = Utc.with_ymd_and_hms(2022, 11, 3, 4, 5, 9).unwrap();

        let mut buf = vec![];
        entry.write(&mut buf)?;

        let s = String::from_utf8(buf)?;
        assert_eq!(
            s.lines().last(),
            Some(" -- maintainer <me@example.com>  Thu, 03 Nov 2022 04:05:09 +0000")
        );

        Ok(())
    }

    #[test]
    fn test_write_multiple() -> Result<()> {
        let mut changelog = Changelog::default();
        changelog.add_entry(entry("0.2"));
        changelog.add_entry(entry("0.1"));

        let mut buf = vec![];
        changelog.write(&mut buf)?;

        let s = String::from_utf8(buf)?;
        assert_eq!(s.lines().filter(|l| l.starts_with("mypackage (")).count(), 2);
        assert!(s.contains("+0000\n\nmypackage (0.1)"));

        Ok(())
    }
}
