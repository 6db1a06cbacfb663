//! Error types
//!
//! Each layer has its own error enum; [`Error`] wraps the ones that can
//! surface from I/O paths (server, connection, client).

use std::fmt;
use std::io;

use crate::codec::FieldKind;
use crate::registry::RegistryError;

/// Crate-level result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error
#[derive(Debug)]
pub enum Error {
    /// Socket or listener failure
    Io(io::Error),
    /// Record encoding/decoding failure
    Codec(CodecError),
    /// Event framing failure
    Frame(FrameError),
    /// Connection could not join the registry
    Registry(RegistryError),
    /// Peer closed the connection
    ConnectionClosed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Codec(e) => write!(f, "Codec error: {}", e),
            Error::Frame(e) => write!(f, "Frame error: {}", e),
            Error::Registry(e) => write!(f, "Registry error: {}", e),
            Error::ConnectionClosed => write!(f, "Connection closed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Codec(e) => Some(e),
            Error::Frame(e) => Some(e),
            Error::Registry(e) => Some(e),
            Error::ConnectionClosed => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Error::Codec(e)
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Error::Registry(e)
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

/// Record codec errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Buffer ended before a field could be read
    TruncatedInput {
        /// Bytes the current read required
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },
    /// Cursor positioned past the end of the buffer
    CursorOutOfBounds { cursor: usize, len: usize },
    /// A dynamic record holds a value that does not match the field kind
    KindMismatch {
        field: String,
        expected: FieldKind,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::TruncatedInput { needed, remaining } => write!(
                f,
                "Truncated input: needed {} bytes, {} remaining",
                needed, remaining
            ),
            CodecError::CursorOutOfBounds { cursor, len } => {
                write!(f, "Cursor {} out of bounds for buffer of {} bytes", cursor, len)
            }
            CodecError::KindMismatch { field, expected } => {
                write!(f, "Field '{}' does not hold a {} value", field, expected)
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Errors from parsing a message definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Field kind is not a supported primitive
    UnknownKind { line: usize, kind: String },
    /// Line is not `kind name`
    MalformedLine { line: usize, text: String },
    /// Same field name declared twice
    DuplicateField(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnknownKind { line, kind } => {
                write!(f, "Unknown field kind '{}' on line {}", kind, line)
            }
            SchemaError::MalformedLine { line, text } => {
                write!(f, "Malformed field declaration on line {}: '{}'", line, text)
            }
            SchemaError::DuplicateField(name) => write!(f, "Duplicate field '{}'", name),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Event framing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Declared frame size exceeds the configured maximum
    TooLarge { size: usize, max: usize },
    /// Event name longer than the u16 length prefix allows
    NameTooLong(usize),
    /// Event name is not valid UTF-8
    InvalidName,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::TooLarge { size, max } => {
                write!(f, "Frame of {} bytes exceeds maximum of {}", size, max)
            }
            FrameError::NameTooLong(len) => write!(f, "Event name too long: {} bytes", len),
            FrameError::InvalidName => write!(f, "Event name is not valid UTF-8"),
        }
    }
}

impl std::error::Error for FrameError {}
