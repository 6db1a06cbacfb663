//! Event framing on the wire
//!
//! ```text
//! +----------------+-------------+-------------------+----------------+
//! | name_len (u16) | name (utf8) | payload_len (u32) | payload        |
//! +----------------+-------------+-------------------+----------------+
//!   little-endian                  little-endian       opaque bytes
//! ```

use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::FrameError;

/// Fixed bytes in every frame (both length prefixes)
pub const FRAME_OVERHEAD: usize = 2 + 4;

/// Default cap on a single frame
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// One named event as carried over a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFrame {
    pub name: Arc<str>,
    pub payload: Bytes,
}

impl EventFrame {
    pub fn new(name: impl Into<Arc<str>>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// Total encoded size
    pub fn encoded_len(&self) -> usize {
        FRAME_OVERHEAD + self.name.len() + self.payload.len()
    }

    /// Append the encoded frame to `buf`.
    ///
    /// Nothing is written if the name or payload does not fit its length prefix.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), FrameError> {
        let name_len = u16::try_from(self.name.len())
            .map_err(|_| FrameError::NameTooLong(self.name.len()))?;
        let payload_len = payload_len_prefix(self.payload.len())?;

        buf.reserve(self.encoded_len());
        buf.put_u16_le(name_len);
        buf.put_slice(self.name.as_bytes());
        buf.put_u32_le(payload_len);
        buf.put_slice(&self.payload);
        Ok(())
    }

    /// Take one complete frame off the front of `buf`.
    ///
    /// Returns `Ok(None)` and leaves `buf` untouched when more bytes are needed.
    pub fn decode(buf: &mut BytesMut, max_frame_size: usize) -> Result<Option<Self>, FrameError> {
        if buf.len() < 2 {
            return Ok(None);
        }
        let name_len = u16::from_le_bytes([buf[0], buf[1]]) as usize;

        let header_len = FRAME_OVERHEAD + name_len;
        if header_len > max_frame_size {
            return Err(FrameError::TooLarge {
                size: header_len,
                max: max_frame_size,
            });
        }
        if buf.len() < header_len {
            buf.reserve(header_len - buf.len());
            return Ok(None);
        }

        let len_at = 2 + name_len;
        let payload_len = u32::from_le_bytes([
            buf[len_at],
            buf[len_at + 1],
            buf[len_at + 2],
            buf[len_at + 3],
        ]) as usize;

        let total = header_len + payload_len;
        if total > max_frame_size {
            return Err(FrameError::TooLarge {
                size: total,
                max: max_frame_size,
            });
        }
        if buf.len() < total {
            buf.reserve(total - buf.len());
            return Ok(None);
        }

        let mut frame = buf.split_to(total);
        frame.advance(2);
        let name_bytes = frame.split_to(name_len);
        let name = std::str::from_utf8(&name_bytes).map_err(|_| FrameError::InvalidName)?;
        let name: Arc<str> = Arc::from(name);
        frame.advance(4);

        Ok(Some(Self {
            name,
            payload: frame.freeze(),
        }))
    }
}

fn payload_len_prefix(len: usize) -> Result<u32, FrameError> {
    u32::try_from(len).map_err(|_| FrameError::TooLarge {
        size: len,
        max: u32::MAX as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(frame: &EventFrame) -> BytesMut {
        let mut buf = BytesMut::new();
        frame.encode(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_layout() {
        let buf = encoded(&EventFrame::new("log", Bytes::from_static(&[0xAA, 0xBB])));
        assert_eq!(
            &buf[..],
            &[3, 0, b'l', b'o', b'g', 2, 0, 0, 0, 0xAA, 0xBB]
        );
    }

    #[test]
    fn test_decode_complete() {
        let frame = EventFrame::new("server_logger", Bytes::from_static(b"payload"));
        let mut buf = encoded(&frame);
        assert_eq!(buf.len(), frame.encoded_len());

        let decoded = EventFrame::decode(&mut buf, DEFAULT_MAX_FRAME_SIZE).unwrap();
        assert_eq!(decoded, Some(frame));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_partial_waits() {
        let frame = EventFrame::new("e", Bytes::from_static(b"abc"));
        let full = encoded(&frame);

        for cut in 0..full.len() {
            let mut buf = BytesMut::from(&full[..cut]);
            assert_eq!(EventFrame::decode(&mut buf, DEFAULT_MAX_FRAME_SIZE), Ok(None));
            assert_eq!(buf.len(), cut);
        }
    }

    #[test]
    fn test_decode_leaves_following_frame() {
        let first = EventFrame::new("a", Bytes::from_static(b"1"));
        let second = EventFrame::new("b", Bytes::new());
        let mut buf = encoded(&first);
        second.encode(&mut buf).unwrap();

        assert_eq!(
            EventFrame::decode(&mut buf, DEFAULT_MAX_FRAME_SIZE).unwrap(),
            Some(first)
        );
        assert_eq!(
            EventFrame::decode(&mut buf, DEFAULT_MAX_FRAME_SIZE).unwrap(),
            Some(second)
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_too_large() {
        let frame = EventFrame::new("big", Bytes::from(vec![0u8; 100]));
        let mut buf = encoded(&frame);
        // Header alone is enough to reject
        buf.truncate(FRAME_OVERHEAD + 3);
        assert_eq!(
            EventFrame::decode(&mut buf, 50),
            Err(FrameError::TooLarge { size: 109, max: 50 })
        );
    }

    #[test]
    fn test_decode_invalid_name() {
        let mut buf = BytesMut::from(&[2u8, 0, 0xFF, 0xFE, 0, 0, 0, 0][..]);
        assert_eq!(
            EventFrame::decode(&mut buf, DEFAULT_MAX_FRAME_SIZE),
            Err(FrameError::InvalidName)
        );
    }

    #[test]
    fn test_payload_len_prefix_bounds() {
        assert_eq!(payload_len_prefix(0), Ok(0));
        assert_eq!(payload_len_prefix(u32::MAX as usize), Ok(u32::MAX));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_payload_len_prefix_overflow() {
        let len = u32::MAX as usize + 1;
        assert_eq!(
            payload_len_prefix(len),
            Err(FrameError::TooLarge {
                size: len,
                max: u32::MAX as usize
            })
        );
    }

    #[test]
    fn test_encode_name_too_long() {
        let name = "n".repeat(u16::MAX as usize + 1);
        let mut buf = BytesMut::new();
        assert_eq!(
            EventFrame::new(name, Bytes::new()).encode(&mut buf),
            Err(FrameError::NameTooLong(65536))
        );
        assert!(buf.is_empty());
    }
}
