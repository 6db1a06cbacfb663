//! Low-level little-endian reader and writer
//!
//! [`WireReader`] tracks an explicit cursor so callers can decode several
//! records back to back from one buffer and learn where each one ended.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::text::Text;
use crate::error::CodecError;

/// Width of the length prefix in front of every `string` field
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Longest `string` field the length prefix can describe
pub const MAX_TEXT_LEN: usize = u32::MAX as usize;

/// Growing output buffer
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(64),
        }
    }

    /// Create writer with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Take the written bytes, leaving the writer empty
    pub fn finish(&mut self) -> Bytes {
        self.buf.split().freeze()
    }

    pub fn put_bool(&mut self, v: bool) {
        self.buf.put_u8(v as u8);
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn put_i8(&mut self, v: i8) {
        self.buf.put_i8(v);
    }

    pub fn put_u16(&mut self, v: u16) {
        self.buf.put_u16_le(v);
    }

    pub fn put_i16(&mut self, v: i16) {
        self.buf.put_i16_le(v);
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.put_u32_le(v);
    }

    pub fn put_i32(&mut self, v: i32) {
        self.buf.put_i32_le(v);
    }

    pub fn put_u64(&mut self, v: u64) {
        self.buf.put_u64_le(v);
    }

    pub fn put_i64(&mut self, v: i64) {
        self.buf.put_i64_le(v);
    }

    pub fn put_f32(&mut self, v: f32) {
        self.buf.put_f32_le(v);
    }

    pub fn put_f64(&mut self, v: f64) {
        self.buf.put_f64_le(v);
    }

    /// Length-prefixed byte string.
    ///
    /// # Panics
    ///
    /// If `bytes` is longer than [`MAX_TEXT_LEN`]. Such a field cannot be
    /// encoded, and writing a wrapped prefix would corrupt every following field.
    pub fn put_text(&mut self, bytes: &[u8]) {
        let len = u32::try_from(bytes.len())
            .unwrap_or_else(|_| panic!("string field of {} bytes exceeds MAX_TEXT_LEN", bytes.len()));
        self.buf.put_u32_le(len);
        self.buf.put_slice(bytes);
    }
}

impl Default for WireWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor over an immutable buffer
pub struct WireReader {
    buf: Bytes,
    pos: usize,
}

impl WireReader {
    /// Reader positioned at the start of `buf`
    pub fn new(buf: Bytes) -> Self {
        Self { buf, pos: 0 }
    }

    /// Reader positioned at `cursor`
    pub fn at(buf: Bytes, cursor: usize) -> Result<Self, CodecError> {
        if cursor > buf.len() {
            return Err(CodecError::CursorOutOfBounds {
                cursor,
                len: buf.len(),
            });
        }
        Ok(Self { buf, pos: cursor })
    }

    /// Current cursor
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consume `n` bytes, failing without moving the cursor if fewer remain
    fn take(&mut self, n: usize) -> Result<&[u8], CodecError> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(CodecError::TruncatedInput {
                needed: n,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.buf[start..start + n])
    }

    pub fn get_bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.get_u8()? != 0)
    }

    pub fn get_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn get_i8(&mut self) -> Result<i8, CodecError> {
        Ok(self.get_u8()? as i8)
    }

    pub fn get_u16(&mut self) -> Result<u16, CodecError> {
        Ok(self.take(2)?.get_u16_le())
    }

    pub fn get_i16(&mut self) -> Result<i16, CodecError> {
        Ok(self.take(2)?.get_i16_le())
    }

    pub fn get_u32(&mut self) -> Result<u32, CodecError> {
        Ok(self.take(4)?.get_u32_le())
    }

    pub fn get_i32(&mut self) -> Result<i32, CodecError> {
        Ok(self.take(4)?.get_i32_le())
    }

    pub fn get_u64(&mut self) -> Result<u64, CodecError> {
        Ok(self.take(8)?.get_u64_le())
    }

    pub fn get_i64(&mut self) -> Result<i64, CodecError> {
        Ok(self.take(8)?.get_i64_le())
    }

    pub fn get_f32(&mut self) -> Result<f32, CodecError> {
        Ok(self.take(4)?.get_f32_le())
    }

    pub fn get_f64(&mut self) -> Result<f64, CodecError> {
        Ok(self.take(8)?.get_f64_le())
    }

    /// Length-prefixed byte string, sliced out of the buffer without copying
    pub fn get_text(&mut self) -> Result<Text, CodecError> {
        let start = self.pos;
        let len = self.get_u32()? as usize;
        let remaining = self.remaining();
        if remaining < len {
            self.pos = start;
            return Err(CodecError::TruncatedInput {
                needed: len,
                remaining,
            });
        }
        let text = self.buf.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(Text::from(text))
    }
}
