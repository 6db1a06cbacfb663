//! Typed records
//!
//! Use the [`record!`](crate::record) macro to declare a record type. It
//! generates the struct, a `Default` impl and the [`Record`] impl, with the
//! schema built once per type on first use.
//!
//! ```
//! use relay_rs::codec::{Record, Text};
//!
//! relay_rs::record! {
//!     /// A point on a score board
//!     pub struct Entry: "scores/Entry" {
//!         pub player: Text,
//!         pub points: u32,
//!     }
//! }
//!
//! let entry = Entry { player: "ada".into(), points: 7 };
//! let bytes = entry.serialize();
//! assert_eq!(bytes.len(), entry.encoded_len());
//! let (decoded, end) = Entry::deserialize(&bytes, 0).unwrap();
//! assert_eq!(decoded, entry);
//! assert_eq!(end, bytes.len());
//! ```

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

use super::kind::FieldValue;
use super::schema::Schema;
use super::wire::{WireReader, WireWriter};
use crate::error::CodecError;

/// Partially-specified record input for `resolve`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRecord {
    values: HashMap<String, FieldValue>,
}

impl PartialRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Value for `name` unless absent or [`FieldValue::Undefined`]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name).filter(|v| !v.is_undefined())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for PartialRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut partial = Self::new();
        for (k, v) in iter {
            partial.insert(k, v);
        }
        partial
    }
}

/// A record type with a compile-time schema
pub trait Record: Sized + Clone + Default + PartialEq + fmt::Debug {
    /// Datatype name, e.g. `beginner_tutorials/Num`
    const DATATYPE: &'static str;

    /// Type descriptor, built once per type
    fn schema() -> &'static Schema;

    /// Write every field in declaration order
    fn encode_into(&self, w: &mut WireWriter);

    /// Read every field in declaration order
    fn decode_from(r: &mut WireReader) -> Result<Self, CodecError>;

    /// Exact number of bytes [`serialize`](Record::serialize) produces
    fn encoded_len(&self) -> usize;

    /// Build a record from partial input, defaulting whatever is missing.
    ///
    /// Values of a different kind go through best-effort coercion and fall
    /// back to the default when they cannot be converted.
    fn resolve(partial: &PartialRecord) -> Self;

    /// Fingerprint of the schema
    fn fingerprint() -> &'static str {
        Self::schema().fingerprint()
    }

    /// Canonical schema text
    fn definition() -> &'static str {
        Self::schema().definition()
    }

    /// Encode into a fresh buffer
    fn serialize(&self) -> Bytes {
        let mut w = WireWriter::with_capacity(self.encoded_len());
        self.encode_into(&mut w);
        w.finish()
    }

    /// Decode one record starting at `cursor`.
    ///
    /// Returns the record and the cursor just past its last field.
    fn deserialize(data: &Bytes, cursor: usize) -> Result<(Self, usize), CodecError> {
        let mut r = WireReader::at(data.clone(), cursor)?;
        let record = Self::decode_from(&mut r)?;
        Ok((record, r.position()))
    }
}

/// Declare a typed record.
///
/// Every field type must implement [`Field`](crate::codec::Field).
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $datatype:literal {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty, )*
        }

        #[allow(unused_variables)]
        impl $crate::codec::Record for $name {
            const DATATYPE: &'static str = $datatype;

            fn schema() -> &'static $crate::codec::Schema {
                static SCHEMA: ::std::sync::OnceLock<$crate::codec::Schema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::codec::Schema::new(
                        $datatype,
                        ::std::vec![
                            $( $crate::codec::FieldDef::new(
                                stringify!($field),
                                <$ty as $crate::codec::Field>::KIND,
                            ), )*
                        ],
                    )
                })
            }

            fn encode_into(&self, w: &mut $crate::codec::WireWriter) {
                $( $crate::codec::Field::write(&self.$field, w); )*
            }

            fn decode_from(
                r: &mut $crate::codec::WireReader,
            ) -> ::std::result::Result<Self, $crate::error::CodecError> {
                Ok(Self {
                    $( $field: <$ty as $crate::codec::Field>::read(r)?, )*
                })
            }

            fn encoded_len(&self) -> usize {
                0 $( + $crate::codec::Field::wire_len(&self.$field) )*
            }

            fn resolve(partial: &$crate::codec::PartialRecord) -> Self {
                Self {
                    $( $field: partial
                        .get(stringify!($field))
                        .and_then(<$ty as $crate::codec::Field>::coerce)
                        .unwrap_or_default(), )*
                }
            }
        }
    };
}
