//! Fixed-schema binary record codec
//!
//! Records are flat, ordered lists of primitive fields. The encoding has no
//! framing, tags or version byte; both ends must agree on the schema, which is
//! what the [`Schema::fingerprint`] is for.
//!
//! Wire layout per field kind:
//! ```text
//! bool                 1 byte (0x00 / 0x01)
//! int8, uint8          1 byte
//! int16, uint16        2 bytes, little-endian
//! int32, uint32        4 bytes, little-endian
//! int64, uint64        8 bytes, little-endian
//! float32, float64     IEEE 754, little-endian
//! string               u32 LE length + raw bytes (not validated)
//! ```
//!
//! A `string` longer than [`MAX_TEXT_LEN`] has no encoding; serializing one
//! panics rather than emitting a wrapped length prefix.
//!
//! Two flavours of record share the same wire format:
//! - typed records declared with [`record!`](crate::record) implement [`Record`]
//! - [`DynamicRecord`] carries a runtime [`Schema`], e.g. one parsed from a
//!   message definition

pub mod dynamic;
pub mod field;
pub mod kind;
pub mod record;
pub mod schema;
pub mod text;
pub mod wire;

pub use dynamic::DynamicRecord;
pub use field::Field;
pub use kind::{FieldKind, FieldValue};
pub use record::{PartialRecord, Record};
pub use schema::{FieldDef, Schema};
pub use text::Text;
pub use wire::{WireReader, WireWriter, LENGTH_PREFIX_SIZE, MAX_TEXT_LEN};
