//! Registry error types
//!
//! Both variants describe benign races in connection lifecycle notifications.
//! They are logged and surfaced for inspection, never treated as fatal.

use super::entry::ConnectionId;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Connection id is already registered
    DuplicateRegistration(ConnectionId),
    /// Connection id is not registered
    UnknownConnection(ConnectionId),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateRegistration(id) => {
                write!(f, "Connection already registered: {}", id)
            }
            RegistryError::UnknownConnection(id) => write!(f, "Unknown connection: {}", id),
        }
    }
}

impl std::error::Error for RegistryError {}
