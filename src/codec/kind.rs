//! Field kinds and loosely-typed field values

use std::fmt;

use super::text::Text;
use super::wire::LENGTH_PREFIX_SIZE;

/// Primitive kind of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    /// Length-prefixed byte string
    String,
}

impl FieldKind {
    /// Name used in message definitions and the canonical schema text
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int8 => "int8",
            FieldKind::UInt8 => "uint8",
            FieldKind::Int16 => "int16",
            FieldKind::UInt16 => "uint16",
            FieldKind::Int32 => "int32",
            FieldKind::UInt32 => "uint32",
            FieldKind::Int64 => "int64",
            FieldKind::UInt64 => "uint64",
            FieldKind::Float32 => "float32",
            FieldKind::Float64 => "float64",
            FieldKind::String => "string",
        }
    }

    /// Look up a kind by its definition name
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "bool" => FieldKind::Bool,
            "int8" => FieldKind::Int8,
            "uint8" => FieldKind::UInt8,
            "int16" => FieldKind::Int16,
            "uint16" => FieldKind::UInt16,
            "int32" => FieldKind::Int32,
            "uint32" => FieldKind::UInt32,
            "int64" => FieldKind::Int64,
            "uint64" => FieldKind::UInt64,
            "float32" => FieldKind::Float32,
            "float64" => FieldKind::Float64,
            "string" => FieldKind::String,
            _ => return None,
        };
        Some(kind)
    }

    /// Bytes this kind always occupies on the wire.
    ///
    /// For `string` this is only the length prefix; the text itself is extra.
    pub fn fixed_size(&self) -> usize {
        match self {
            FieldKind::Bool | FieldKind::Int8 | FieldKind::UInt8 => 1,
            FieldKind::Int16 | FieldKind::UInt16 => 2,
            FieldKind::Int32 | FieldKind::UInt32 | FieldKind::Float32 => 4,
            FieldKind::Int64 | FieldKind::UInt64 | FieldKind::Float64 => 8,
            FieldKind::String => LENGTH_PREFIX_SIZE,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, FieldKind::String)
    }

    /// Value a field of this kind takes when none is supplied
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldKind::Bool => FieldValue::Bool(false),
            FieldKind::Int8 | FieldKind::Int16 | FieldKind::Int32 | FieldKind::Int64 => {
                FieldValue::Int(0)
            }
            FieldKind::UInt8 | FieldKind::UInt16 | FieldKind::UInt32 | FieldKind::UInt64 => {
                FieldValue::UInt(0)
            }
            FieldKind::Float32 | FieldKind::Float64 => FieldValue::Float(0.0),
            FieldKind::String => FieldValue::Text(Text::new()),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loosely-typed field value
///
/// Used as input to `resolve` and as the storage of [`DynamicRecord`](super::DynamicRecord).
/// Nothing ties a value to a field kind until it is coerced or encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicitly unset; treated the same as an absent field
    Undefined,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(Text),
}

impl FieldValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, FieldValue::Undefined)
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            FieldValue::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Integer view; `Int` and `UInt` reinterpret each other bit-for-bit
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::UInt(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as u64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::Int(v as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::UInt(v as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<Text> for FieldValue {
    fn from(v: Text) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(Text::from(v))
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(Text::from(v))
    }
}
