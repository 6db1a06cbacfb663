//! Per-kind encoding for typed record fields
//!
//! Out-of-range integers are truncated: coercing a wider value into a field
//! keeps the low bits of the declared width (an `as` cast). Typed fields
//! cannot hold an out-of-range value, so encoding itself never truncates.

use super::kind::{FieldKind, FieldValue};
use super::text::Text;
use super::wire::{WireReader, WireWriter, LENGTH_PREFIX_SIZE};
use crate::error::CodecError;

/// A Rust type usable as a record field
pub trait Field: Sized + Clone + Default + PartialEq {
    /// Kind written into the schema
    const KIND: FieldKind;

    fn write(&self, w: &mut WireWriter);

    fn read(r: &mut WireReader) -> Result<Self, CodecError>;

    /// Exact encoded size of this value
    fn wire_len(&self) -> usize {
        Self::KIND.fixed_size()
    }

    /// Best-effort conversion from a loosely-typed value.
    ///
    /// Returns `None` when the value cannot sensibly become this kind; the
    /// caller then falls back to the default.
    fn coerce(value: &FieldValue) -> Option<Self>;

    /// Loosely-typed copy of this value
    fn to_value(&self) -> FieldValue;
}

impl Field for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn write(&self, w: &mut WireWriter) {
        w.put_bool(*self);
    }

    fn read(r: &mut WireReader) -> Result<Self, CodecError> {
        r.get_bool()
    }

    fn coerce(value: &FieldValue) -> Option<Self> {
        value.as_bool()
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

macro_rules! integer_field {
    ($t:ty, $kind:ident, $put:ident, $get:ident, $variant:ident, $wide:ty) => {
        impl Field for $t {
            const KIND: FieldKind = FieldKind::$kind;

            fn write(&self, w: &mut WireWriter) {
                w.$put(*self);
            }

            fn read(r: &mut WireReader) -> Result<Self, CodecError> {
                r.$get()
            }

            fn coerce(value: &FieldValue) -> Option<Self> {
                value.as_u64().map(|v| v as $t)
            }

            fn to_value(&self) -> FieldValue {
                FieldValue::$variant(*self as $wide)
            }
        }
    };
}

integer_field!(i8, Int8, put_i8, get_i8, Int, i64);
integer_field!(u8, UInt8, put_u8, get_u8, UInt, u64);
integer_field!(i16, Int16, put_i16, get_i16, Int, i64);
integer_field!(u16, UInt16, put_u16, get_u16, UInt, u64);
integer_field!(i32, Int32, put_i32, get_i32, Int, i64);
integer_field!(u32, UInt32, put_u32, get_u32, UInt, u64);
integer_field!(i64, Int64, put_i64, get_i64, Int, i64);
integer_field!(u64, UInt64, put_u64, get_u64, UInt, u64);

impl Field for f32 {
    const KIND: FieldKind = FieldKind::Float32;

    fn write(&self, w: &mut WireWriter) {
        w.put_f32(*self);
    }

    fn read(r: &mut WireReader) -> Result<Self, CodecError> {
        r.get_f32()
    }

    fn coerce(value: &FieldValue) -> Option<Self> {
        value.as_f64().map(|v| v as f32)
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(*self as f64)
    }
}

impl Field for f64 {
    const KIND: FieldKind = FieldKind::Float64;

    fn write(&self, w: &mut WireWriter) {
        w.put_f64(*self);
    }

    fn read(r: &mut WireReader) -> Result<Self, CodecError> {
        r.get_f64()
    }

    fn coerce(value: &FieldValue) -> Option<Self> {
        value.as_f64()
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl Field for Text {
    const KIND: FieldKind = FieldKind::String;

    fn write(&self, w: &mut WireWriter) {
        w.put_text(self.as_bytes());
    }

    fn read(r: &mut WireReader) -> Result<Self, CodecError> {
        r.get_text()
    }

    fn wire_len(&self) -> usize {
        LENGTH_PREFIX_SIZE + self.len()
    }

    fn coerce(value: &FieldValue) -> Option<Self> {
        value.as_text().cloned()
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

/// Encode a loosely-typed value as `kind`.
///
/// Uses the same coercion rules as typed fields, so an `Int(300)` written as
/// `uint8` becomes `44`. Returns `false` without writing when the value has no
/// meaning for the kind.
pub(crate) fn write_value(kind: FieldKind, value: &FieldValue, w: &mut WireWriter) -> bool {
    fn put<T: Field>(value: &FieldValue, w: &mut WireWriter) -> bool {
        match T::coerce(value) {
            Some(v) => {
                v.write(w);
                true
            }
            None => false,
        }
    }

    match kind {
        FieldKind::Bool => put::<bool>(value, w),
        FieldKind::Int8 => put::<i8>(value, w),
        FieldKind::UInt8 => put::<u8>(value, w),
        FieldKind::Int16 => put::<i16>(value, w),
        FieldKind::UInt16 => put::<u16>(value, w),
        FieldKind::Int32 => put::<i32>(value, w),
        FieldKind::UInt32 => put::<u32>(value, w),
        FieldKind::Int64 => put::<i64>(value, w),
        FieldKind::UInt64 => put::<u64>(value, w),
        FieldKind::Float32 => put::<f32>(value, w),
        FieldKind::Float64 => put::<f64>(value, w),
        FieldKind::String => put::<Text>(value, w),
    }
}

/// Decode one value of `kind`
pub(crate) fn read_value(kind: FieldKind, r: &mut WireReader) -> Result<FieldValue, CodecError> {
    let value = match kind {
        FieldKind::Bool => bool::read(r)?.to_value(),
        FieldKind::Int8 => i8::read(r)?.to_value(),
        FieldKind::UInt8 => u8::read(r)?.to_value(),
        FieldKind::Int16 => i16::read(r)?.to_value(),
        FieldKind::UInt16 => u16::read(r)?.to_value(),
        FieldKind::Int32 => i32::read(r)?.to_value(),
        FieldKind::UInt32 => u32::read(r)?.to_value(),
        FieldKind::Int64 => i64::read(r)?.to_value(),
        FieldKind::UInt64 => u64::read(r)?.to_value(),
        FieldKind::Float32 => f32::read(r)?.to_value(),
        FieldKind::Float64 => f64::read(r)?.to_value(),
        FieldKind::String => Text::read(r)?.to_value(),
    };
    Ok(value)
}
