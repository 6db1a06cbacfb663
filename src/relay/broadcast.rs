//! Fan-out of events to every other connection

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::config::RelayConfig;
use super::error::ForwardFailure;
use super::event::BroadcastEvent;
use crate::registry::{ConnectionId, ConnectionRegistry, RegistryError};
use crate::stats::{RelayCounters, RelayStats};

/// Outcome of one fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanoutReport {
    /// Targets the event was queued for, in delivery order
    pub delivered: Vec<ConnectionId>,
    /// Targets that could not take the event
    pub failed: Vec<(ConnectionId, ForwardFailure)>,
}

impl FanoutReport {
    /// Number of targets attempted
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Broadcast relay
///
/// Owns an `Arc` to its registry; clone the `Arc<Relay>` into each
/// connection task.
pub struct Relay {
    registry: Arc<ConnectionRegistry>,
    config: RelayConfig,
    counters: RelayCounters,
}

impl Relay {
    /// Create a relay with default configuration
    pub fn new() -> Self {
        Self::with_config(RelayConfig::default())
    }

    /// Create a relay with custom configuration
    pub fn with_config(config: RelayConfig) -> Self {
        Self::with_registry(Arc::new(ConnectionRegistry::new()), config)
    }

    /// Create a relay around an existing registry
    pub fn with_registry(registry: Arc<ConnectionRegistry>, config: RelayConfig) -> Self {
        Self {
            registry,
            config,
            counters: RelayCounters::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn stats(&self) -> RelayStats {
        self.counters.snapshot()
    }

    /// A connection was accepted. Events for it are pushed into `outbound`.
    ///
    /// If `id` is already registered the existing entry is kept and `outbound`
    /// is dropped. The caller then owns nothing in the registry and must not
    /// call [`on_disconnect`](Relay::on_disconnect) for this session.
    pub async fn on_connect(
        &self,
        id: ConnectionId,
        outbound: mpsc::Sender<BroadcastEvent>,
    ) -> Result<(), RegistryError> {
        self.registry.register(id, outbound).await?;
        RelayCounters::incr(&self.counters.connections_opened, 1);
        tracing::info!(connection_id = %id, "Connection opened");
        Ok(())
    }

    /// Forward `event` to every registered connection other than its origin.
    ///
    /// Targets are snapshotted first and the registry lock is released before
    /// any delivery. Delivery never waits: a closed or full target queue is
    /// recorded in the report and the next target is tried.
    pub async fn on_event(&self, event: BroadcastEvent) -> FanoutReport {
        RelayCounters::incr(&self.counters.events_received, 1);

        if !self.config.accepts(&event.name) {
            RelayCounters::incr(&self.counters.events_filtered, 1);
            tracing::debug!(
                connection_id = %event.origin,
                event = %event.name,
                "Event not relayed"
            );
            return FanoutReport::default();
        }

        let targets = self.registry.targets(event.origin).await;
        let mut report = FanoutReport::default();

        for target in targets {
            match target.outbound.try_send(event.clone()) {
                Ok(()) => report.delivered.push(target.id),
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        connection_id = %target.id,
                        event = %event.name,
                        "Outbound queue full, event dropped for target"
                    );
                    report.failed.push((target.id, ForwardFailure::QueueFull));
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(
                        connection_id = %target.id,
                        event = %event.name,
                        "Target disconnected during fan-out"
                    );
                    report.failed.push((target.id, ForwardFailure::Disconnected));
                }
            }
        }

        RelayCounters::incr(&self.counters.deliveries, report.delivered.len() as u64);
        RelayCounters::incr(&self.counters.forward_failures, report.failed.len() as u64);

        tracing::debug!(
            connection_id = %event.origin,
            event = %event.name,
            bytes = event.payload.len(),
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "Event relayed"
        );

        report
    }

    /// A connection went away
    pub async fn on_disconnect(&self, id: ConnectionId) {
        if self.registry.unregister(id).await.is_ok() {
            RelayCounters::incr(&self.counters.connections_closed, 1);
            tracing::info!(connection_id = %id, "Connection closed");
        }
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}
