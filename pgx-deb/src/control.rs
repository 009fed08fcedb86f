// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Writing of Debian control files.

See <https://www.debian.org/doc/debian-policy/ch-controlfields.html>
for how control files are structured.
*/

use std::{borrow::Cow, io::Write};

/// A field in a control file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ControlField<'a> {
    name: Cow<'a, str>,
    value: Cow<'a, str>,
}

impl<'a> ControlField<'a> {
    /// Construct an instance from a field name and value.
    pub fn new(name: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The name of this field.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// The raw value of this field.
    pub fn value_str(&self) -> &str {
        self.value.as_ref()
    }

    /// Write the contents of this field to a writer.
    ///
    /// The `: ` separator is always written, even for empty values.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.name.as_bytes())?;
        writer.write_all(b": ")?;
        writer.write_all(self.value.as_bytes())?;
        writer.write_all(b"\n")
    }
}

/// A paragraph in a control file.
///
/// A paragraph is an ordered series of control fields. Field names are case
/// insensitive and a paragraph holds at most one field of a given name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ControlParagraph<'a> {
    fields: Vec<ControlField<'a>>,
}

impl<'a> ControlParagraph<'a> {
    /// Whether the paragraph has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Set the value of a field.
    ///
    /// An existing field with the same name (case insensitive compare) is removed
    /// and the new field is appended.
    pub fn set_field(&mut self, field: ControlField<'a>) {
        self.fields
            .retain(|cf| !cf.name.eq_ignore_ascii_case(&field.name));
        self.fields.push(field);
    }

    /// Set the value of a field defined via strings.
    #[must_use]
    pub fn with_field(
        mut self,
        name: impl Into<Cow<'a, str>>,
        value: impl Into<Cow<'a, str>>,
    ) -> Self {
        self.set_field(ControlField::new(name, value));
        self
    }

    /// Obtain the field with a given name.
    pub fn field(&self, name: &str) -> Option<&ControlField<'a>> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Obtain the raw string value of the named field.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).map(|f| f.value_str())
    }

    /// Iterate over fields in insertion order.
    pub fn iter_fields(&self) -> impl Iterator<Item = &ControlField<'a>> {
        self.fields.iter()
    }

    /// Serialize the paragraph to a writer.
    ///
    /// Each field is newline terminated. No blank line is written after the
    /// final field.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for field in &self.fields {
            field.write(writer)?;
        }

        Ok(())
    }
}

/// Represents a `debian/control` file.
///
/// A source package control file has a general paragraph describing the source
/// package followed by one paragraph per binary package.
#[derive(Clone, Debug, Default)]
pub struct SourceControl<'a> {
    general: ControlParagraph<'a>,
    binaries: Vec<ControlParagraph<'a>>,
}

impl<'a> SourceControl<'a> {
    /// Construct an instance from its general paragraph.
    pub fn new(general: ControlParagraph<'a>) -> Self {
        Self {
            general,
            binaries: vec![],
        }
    }

    /// Register a paragraph describing a binary package.
    pub fn add_binary(&mut self, paragraph: ControlParagraph<'a>) {
        self.binaries.push(paragraph);
    }

    /// Obtain a handle on the general paragraph.
    pub fn general_paragraph(&self) -> &ControlParagraph<'a> {
        &self.general
    }

    /// Obtain an iterator over paragraphs defining binaries.
    pub fn binary_paragraphs(&self) -> impl Iterator<Item = &ControlParagraph<'a>> {
        self.binaries.iter()
    }

    /// Serialize to a writer.
    ///
    /// Paragraphs are separated by a single blank line.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.general.write(writer)?;

        for p in &self.binaries {
            writer.write_all(b"\n")?;
            p.write(writer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, anyhow::Result};

    #[test]
    fn control_paragraph_field_semantics() {
        let mut p = ControlParagraph::default();
        assert!(p.is_empty());

        // Same cased field name results in overwrite.
        p.set_field(ControlField::new("foo", "bar"));
        p.set_field(ControlField::new("foo", "baz"));
        assert_eq!(p.field_str("foo"), Some("baz"));

        // Different case results in overwrite.
        p.set_field(ControlField::new("FOO", "bar"));
        assert_eq!(p.field_str("foo"), Some("bar"));
        assert_eq!(p.field("Foo").map(|f| f.name()), Some("FOO"));
        assert_eq!(p.iter_fields().count(), 1);
    }

    #[test]
    fn write_empty_value() -> Result<()> {
        let mut buf = vec![];
        ControlField::new("Depends", "").write(&mut buf)?;
        assert_eq!(String::from_utf8(buf)?, "Depends: \n");

        Ok(())
    }

    #[test]
    fn write_source_control() -> Result<()> {
        let mut control = SourceControl::new(
            ControlParagraph::default()
                .with_field("Source", "foo")
                .with_field("Section", "database"),
        );
        control.add_binary(
            ControlParagraph::default()
                .with_field("Package", "foo")
                .with_field("Architecture", "amd64"),
        );

        assert_eq!(control.general_paragraph().field_str("source"), Some("foo"));
        assert_eq!(control.binary_paragraphs().count(), 1);

        let mut buf = vec![];
        control.write(&mut buf)?;

        assert_eq!(
            String::from_utf8(buf)?,
            "Source: foo\nSection: database\n\nPackage: foo\nArchitecture: amd64\n"
        );

        Ok(())
    }
}
