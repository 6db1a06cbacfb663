//! Record schemas and type fingerprints
//!
//! The canonical schema text is one `kind name` line per field, in declaration
//! order, joined with `\n` and without a trailing newline. The fingerprint is
//! the MD5 digest of that text, hex encoded, which is the md5sum ROS message
//! tooling publishes for the same layout. The datatype name does not take part,
//! so two packages declaring the same layout share a fingerprint.

use md5::{Digest, Md5};

use super::kind::FieldKind;
use crate::error::SchemaError;

/// One named field of a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Type descriptor for a record layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    datatype: String,
    fields: Vec<FieldDef>,
    definition: String,
    fingerprint: String,
    fixed_size: usize,
}

impl Schema {
    /// Build a schema from an ordered field list
    pub fn new(datatype: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        let definition = fields
            .iter()
            .map(|f| format!("{} {}", f.kind, f.name))
            .collect::<Vec<_>>()
            .join("\n");
        let fingerprint = hex::encode(Md5::digest(definition.as_bytes()));
        let fixed_size = fields.iter().map(|f| f.kind.fixed_size()).sum();

        Self {
            datatype: datatype.into(),
            fields,
            definition,
            fingerprint,
            fixed_size,
        }
    }

    /// Parse a message definition.
    ///
    /// ```text
    /// # comments and blank lines are ignored
    /// string first_name
    /// uint8 age   # trailing comments too
    /// ```
    pub fn parse(datatype: impl Into<String>, text: &str) -> Result<Self, SchemaError> {
        let mut fields: Vec<FieldDef> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = match raw.find('#') {
                Some(pos) => &raw[..pos],
                None => raw,
            }
            .trim();
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            let (kind, name) = match (parts.next(), parts.next(), parts.next()) {
                (Some(kind), Some(name), None) => (kind, name),
                _ => {
                    return Err(SchemaError::MalformedLine {
                        line: line_no,
                        text: line.to_string(),
                    })
                }
            };

            let kind = FieldKind::from_name(kind).ok_or_else(|| SchemaError::UnknownKind {
                line: line_no,
                kind: kind.to_string(),
            })?;

            if fields.iter().any(|f| f.name == name) {
                return Err(SchemaError::DuplicateField(name.to_string()));
            }
            fields.push(FieldDef::new(name, kind));
        }

        Ok(Self::new(datatype, fields))
    }

    /// Datatype name, e.g. `beginner_tutorials/Num`
    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Canonical schema text
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Hex MD5 digest of the canonical text
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Size of a record whose text fields are all empty
    pub fn fixed_size(&self) -> usize {
        self.fixed_size
    }

    /// Position of a field by name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}
