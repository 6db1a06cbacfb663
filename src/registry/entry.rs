//! Connection entry types

use std::fmt;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::relay::BroadcastEvent;

/// Process-unique connection identifier, assigned by the transport on accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ConnectionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Lifecycle of a connection. `Disconnected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// Entry for a single connection in the registry
#[derive(Debug)]
pub struct ConnectionEntry {
    pub id: ConnectionId,

    /// Sending half of the connection's outbound queue
    pub(super) outbound: mpsc::Sender<BroadcastEvent>,

    /// When the connection registered
    pub connected_at: Instant,
}

impl ConnectionEntry {
    pub(super) fn new(id: ConnectionId, outbound: mpsc::Sender<BroadcastEvent>) -> Self {
        Self {
            id,
            outbound,
            connected_at: Instant::now(),
        }
    }
}

/// Snapshot of one fan-out destination
///
/// Holds its own clone of the sender, so it stays usable after the registry
/// drops the entry; delivery then fails with a closed queue instead.
#[derive(Debug, Clone)]
pub struct FanoutTarget {
    pub id: ConnectionId,
    pub(crate) outbound: mpsc::Sender<BroadcastEvent>,
}
