//! Records driven by a runtime schema

use std::sync::Arc;

use bytes::Bytes;

use super::field::{read_value, write_value};
use super::kind::FieldValue;
use super::record::PartialRecord;
use super::schema::Schema;
use super::wire::{WireReader, WireWriter};
use crate::error::CodecError;

/// A record whose layout is only known at runtime
///
/// Values are stored loosely typed. [`resolve`](DynamicRecord::resolve) and
/// [`set`](DynamicRecord::set) copy values verbatim, so a record can hold a
/// value that does not fit its field; [`serialize`](DynamicRecord::serialize)
/// reports that as [`CodecError::KindMismatch`]. Integers wider than the field
/// are truncated to its width.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    schema: Arc<Schema>,
    values: Vec<FieldValue>,
}

impl DynamicRecord {
    /// All-defaults record
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = schema.fields().iter().map(|f| f.kind.default_value()).collect();
        Self { schema, values }
    }

    /// Copy every defined field of `partial`, defaulting the rest
    pub fn resolve(schema: Arc<Schema>, partial: &PartialRecord) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|f| {
                partial
                    .get(&f.name)
                    .cloned()
                    .unwrap_or_else(|| f.kind.default_value())
            })
            .collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Field value by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema.field_index(name).map(|i| &self.values[i])
    }

    /// Replace a field value. Returns `false` if the schema has no such field.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> bool {
        match self.schema.field_index(name) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    /// Values in field order
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Size [`serialize`](DynamicRecord::serialize) produces for a well-typed record
    pub fn encoded_len(&self) -> usize {
        let text_len: usize = self
            .schema
            .fields()
            .iter()
            .zip(&self.values)
            .filter(|(f, _)| f.kind.is_variable())
            .map(|(_, v)| v.as_text().map_or(0, |t| t.len()))
            .sum();
        self.schema.fixed_size() + text_len
    }

    pub fn encode_into(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        for (field, value) in self.schema.fields().iter().zip(&self.values) {
            if !write_value(field.kind, value, w) {
                return Err(CodecError::KindMismatch {
                    field: field.name.clone(),
                    expected: field.kind,
                });
            }
        }
        Ok(())
    }

    /// Encode into a fresh buffer
    pub fn serialize(&self) -> Result<Bytes, CodecError> {
        let mut w = WireWriter::with_capacity(self.encoded_len());
        self.encode_into(&mut w)?;
        Ok(w.finish())
    }

    pub fn decode_from(schema: Arc<Schema>, r: &mut WireReader) -> Result<Self, CodecError> {
        let values = schema
            .fields()
            .iter()
            .map(|f| read_value(f.kind, r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { schema, values })
    }

    /// Decode one record at `cursor`, returning it and the cursor after it
    pub fn deserialize(
        schema: Arc<Schema>,
        data: &Bytes,
        cursor: usize,
    ) -> Result<(Self, usize), CodecError> {
        let mut r = WireReader::at(data.clone(), cursor)?;
        let record = Self::decode_from(schema, &mut r)?;
        Ok((record, r.position()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FieldKind, Text};

    fn num_schema() -> Arc<Schema> {
        Arc::new(
            Schema::parse(
                "beginner_tutorials/Num",
                "string first_name\nstring last_name\nuint8 age\nuint32 score",
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_defaults() {
        let record = DynamicRecord::new(num_schema());
        assert_eq!(record.get("first_name"), Some(&FieldValue::Text(Text::new())));
        assert_eq!(record.get("age"), Some(&FieldValue::UInt(0)));
        assert_eq!(record.serialize().unwrap().len(), 13);
    }

    #[test]
    fn test_round_trip() {
        let partial = PartialRecord::new()
            .with("first_name", "Ada")
            .with("last_name", "Lovelace")
            .with("age", 36u8)
            .with("score", 100u32);
        let record = DynamicRecord::resolve(num_schema(), &partial);
        let bytes = record.serialize().unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(bytes.len(), record.encoded_len());

        let (decoded, end) = DynamicRecord::deserialize(num_schema(), &bytes, 0).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(end, 24);
    }

    #[test]
    fn test_resolve_copies_wrong_kind_verbatim() {
        let partial = PartialRecord::new().with("age", "thirty-six");
        let record = DynamicRecord::resolve(num_schema(), &partial);
        assert_eq!(
            record.get("age"),
            Some(&FieldValue::Text(Text::from("thirty-six")))
        );
        assert_eq!(
            record.serialize(),
            Err(CodecError::KindMismatch {
                field: "age".into(),
                expected: FieldKind::UInt8
            })
        );
    }

    #[test]
    fn test_out_of_range_truncates() {
        let mut record = DynamicRecord::new(num_schema());
        assert!(record.set("age", 300u32));
        assert!(record.set("score", 1u64 << 32 | 5));
        let bytes = record.serialize().unwrap();

        let (decoded, _) = DynamicRecord::deserialize(num_schema(), &bytes, 0).unwrap();
        assert_eq!(decoded.get("age"), Some(&FieldValue::UInt(44)));
        assert_eq!(decoded.get("score"), Some(&FieldValue::UInt(5)));
    }

    #[test]
    fn test_set_unknown_field() {
        let mut record = DynamicRecord::new(num_schema());
        assert!(!record.set("height", 1u8));
        assert!(record.get("height").is_none());
    }

    #[test]
    fn test_truncated_prefixes() {
        let partial = PartialRecord::new().with("first_name", "Ada").with("score", 7u32);
        let bytes = DynamicRecord::resolve(num_schema(), &partial)
            .serialize()
            .unwrap();
        for len in 0..bytes.len() {
            let prefix = bytes.slice(..len);
            let result = DynamicRecord::deserialize(num_schema(), &prefix, 0);
            assert!(
                matches!(result, Err(CodecError::TruncatedInput { .. })),
                "prefix of {} bytes decoded",
                len
            );
        }
    }
}
