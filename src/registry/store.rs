//! Connection registry implementation

use tokio::sync::{mpsc, RwLock};

use super::entry::{ConnectionEntry, ConnectionId, ConnectionState, FanoutTarget};
use super::error::RegistryError;
use crate::relay::BroadcastEvent;

/// Registry of live connections
///
/// Thread-safe via `RwLock`. Fan-out only needs the read lock, so concurrent
/// events from different producers do not serialize on each other. Nothing
/// awaits I/O while a guard is held.
pub struct ConnectionRegistry {
    /// Entries in registration order
    connections: RwLock<Vec<ConnectionEntry>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(Vec::new()),
        }
    }

    /// Register a connection and its outbound queue.
    ///
    /// A second registration of the same id leaves the existing entry in place
    /// and returns [`RegistryError::DuplicateRegistration`].
    pub async fn register(
        &self,
        id: ConnectionId,
        outbound: mpsc::Sender<BroadcastEvent>,
    ) -> Result<(), RegistryError> {
        let mut connections = self.connections.write().await;

        if connections.iter().any(|entry| entry.id == id) {
            tracing::warn!(connection_id = %id, "Duplicate registration ignored");
            return Err(RegistryError::DuplicateRegistration(id));
        }

        connections.push(ConnectionEntry::new(id, outbound));

        tracing::debug!(
            connection_id = %id,
            connections = connections.len(),
            "Connection registered"
        );

        Ok(())
    }

    /// Remove a connection.
    ///
    /// Removing an id that is not registered changes nothing and returns
    /// [`RegistryError::UnknownConnection`].
    pub async fn unregister(&self, id: ConnectionId) -> Result<(), RegistryError> {
        let mut connections = self.connections.write().await;

        let Some(index) = connections.iter().position(|entry| entry.id == id) else {
            tracing::debug!(connection_id = %id, "Unregister for unknown connection ignored");
            return Err(RegistryError::UnknownConnection(id));
        };

        let entry = connections.remove(index);

        tracing::debug!(
            connection_id = %id,
            connected_for_ms = entry.connected_at.elapsed().as_millis() as u64,
            connections = connections.len(),
            "Connection unregistered"
        );

        Ok(())
    }

    /// Ids of every registered connection except `excluding`, in registration order
    pub async fn others(&self, excluding: ConnectionId) -> Vec<ConnectionId> {
        let connections = self.connections.read().await;
        connections
            .iter()
            .filter(|entry| entry.id != excluding)
            .map(|entry| entry.id)
            .collect()
    }

    /// Like [`others`](Self::others), with each target's outbound queue
    pub async fn targets(&self, excluding: ConnectionId) -> Vec<FanoutTarget> {
        let connections = self.connections.read().await;
        connections
            .iter()
            .filter(|entry| entry.id != excluding)
            .map(|entry| FanoutTarget {
                id: entry.id,
                outbound: entry.outbound.clone(),
            })
            .collect()
    }

    pub async fn state(&self, id: ConnectionId) -> ConnectionState {
        if self.contains(id).await {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.iter().any(|entry| entry.id == id)
    }

    /// Number of registered connections
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> mpsc::Sender<BroadcastEvent> {
        mpsc::channel(1).0
    }

    fn ids(values: &[u64]) -> Vec<ConnectionId> {
        values.iter().copied().map(ConnectionId).collect()
    }

    #[tokio::test]
    async fn test_others_in_registration_order() {
        let registry = ConnectionRegistry::new();
        for id in [3, 1, 2] {
            registry.register(ConnectionId(id), queue()).await.unwrap();
        }

        assert_eq!(registry.others(ConnectionId(1)).await, ids(&[3, 2]));
        assert_eq!(registry.others(ConnectionId(9)).await, ids(&[3, 1, 2]));
        assert_eq!(registry.len().await, 3);
    }

    #[tokio::test]
    async fn test_snapshot_unaffected_by_later_mutation() {
        let registry = ConnectionRegistry::new();
        registry.register(ConnectionId(1), queue()).await.unwrap();
        registry.register(ConnectionId(2), queue()).await.unwrap();

        let snapshot = registry.others(ConnectionId(1)).await;
        registry.unregister(ConnectionId(2)).await.unwrap();
        registry.register(ConnectionId(3), queue()).await.unwrap();

        assert_eq!(snapshot, ids(&[2]));
        assert_eq!(registry.others(ConnectionId(1)).await, ids(&[3]));
    }

    #[tokio::test]
    async fn test_duplicate_register_is_idempotent() {
        let registry = ConnectionRegistry::new();
        registry.register(ConnectionId(1), queue()).await.unwrap();
        registry.register(ConnectionId(2), queue()).await.unwrap();

        let result = registry.register(ConnectionId(1), queue()).await;
        assert_eq!(
            result,
            Err(RegistryError::DuplicateRegistration(ConnectionId(1)))
        );
        assert_eq!(registry.others(ConnectionId(0)).await, ids(&[1, 2]));
    }

    #[tokio::test]
    async fn test_double_unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        registry.register(ConnectionId(1), queue()).await.unwrap();
        registry.register(ConnectionId(2), queue()).await.unwrap();

        registry.unregister(ConnectionId(1)).await.unwrap();
        let result = registry.unregister(ConnectionId(1)).await;
        assert_eq!(result, Err(RegistryError::UnknownConnection(ConnectionId(1))));
        assert_eq!(registry.others(ConnectionId(0)).await, ids(&[2]));
    }

    #[tokio::test]
    async fn test_state() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId(7);
        assert_eq!(registry.state(id).await, ConnectionState::Disconnected);

        registry.register(id, queue()).await.unwrap();
        assert_eq!(registry.state(id).await, ConnectionState::Connected);

        registry.unregister(id).await.unwrap();
        assert_eq!(registry.state(id).await, ConnectionState::Disconnected);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_targets_carry_queues() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::channel(4);
        registry.register(ConnectionId(1), queue()).await.unwrap();
        registry.register(ConnectionId(2), tx).await.unwrap();

        let targets = registry.targets(ConnectionId(1)).await;
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, ConnectionId(2));

        let event = BroadcastEvent::new(ConnectionId(1), "ping", bytes::Bytes::from_static(b"x"));
        targets[0].outbound.try_send(event.clone()).unwrap();
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_concurrent_lifecycle() {
        let registry = std::sync::Arc::new(ConnectionRegistry::new());
        let mut handles = Vec::new();
        for id in 0..32u64 {
            let registry = std::sync::Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.register(ConnectionId(id), queue()).await.unwrap();
                let _ = registry.others(ConnectionId(id)).await;
                if id % 2 == 0 {
                    registry.unregister(ConnectionId(id)).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut remaining = registry.others(ConnectionId(u64::MAX)).await;
        remaining.sort();
        let expected: Vec<_> = (0..32u64).filter(|id| id % 2 == 1).map(ConnectionId).collect();
        assert_eq!(remaining, expected);
    }
}
