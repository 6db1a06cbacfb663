//! Counters for relay activity

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the relay counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Connections registered
    pub connections_opened: u64,
    /// Connections unregistered
    pub connections_closed: u64,
    /// Events received from producers
    pub events_received: u64,
    /// Events not forwarded because their name is not relayed
    pub events_filtered: u64,
    /// Successful hand-offs to a target's outbound queue
    pub deliveries: u64,
    /// Per-target delivery failures
    pub forward_failures: u64,
}

impl RelayStats {
    /// Connections currently open according to the counters
    pub fn connections_open(&self) -> u64 {
        self.connections_opened.saturating_sub(self.connections_closed)
    }
}

/// Live counters, updated with relaxed atomics
#[derive(Debug, Default)]
pub struct RelayCounters {
    pub connections_opened: AtomicU64,
    pub connections_closed: AtomicU64,
    pub events_received: AtomicU64,
    pub events_filtered: AtomicU64,
    pub deliveries: AtomicU64,
    pub forward_failures: AtomicU64,
}

impl RelayCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn incr(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RelayStats {
        RelayStats {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            events_received: self.events_received.load(Ordering::Relaxed),
            events_filtered: self.events_filtered.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            forward_failures: self.forward_failures.load(Ordering::Relaxed),
        }
    }
}
