//! Broadcast event type

use std::sync::Arc;

use bytes::Bytes;

use crate::registry::ConnectionId;

/// A named event carrying an opaque payload
///
/// Cheap to clone: the name is shared and `Bytes` is reference counted, so
/// every fan-out target gets the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastEvent {
    /// Connection the event arrived on
    pub origin: ConnectionId,
    /// Event name, e.g. `server_logger`
    pub name: Arc<str>,
    /// Opaque payload
    pub payload: Bytes,
}

impl BroadcastEvent {
    pub fn new(origin: ConnectionId, name: impl Into<Arc<str>>, payload: impl Into<Bytes>) -> Self {
        Self {
            origin,
            name: name.into(),
            payload: payload.into(),
        }
    }
}
