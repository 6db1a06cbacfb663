//! Relay configuration

use std::collections::HashSet;

/// Relay configuration options
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Event names the relay forwards. Empty forwards everything.
    pub relayed_events: HashSet<String>,
}

impl RelayConfig {
    /// Forward only events named `name` (may be called repeatedly)
    pub fn relay_event(mut self, name: impl Into<String>) -> Self {
        self.relayed_events.insert(name.into());
        self
    }

    /// Whether an event with this name is forwarded
    pub fn accepts(&self, name: &str) -> bool {
        self.relayed_events.is_empty() || self.relayed_events.contains(name)
    }
}
