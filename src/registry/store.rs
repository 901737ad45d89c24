//! Connection registry implementation
//!
//! The central table of live connections and their room memberships.
//! Mutations come from the per-connection reader tasks; iteration comes
//! from the broadcast engine.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tokio::sync::{mpsc, RwLock};

use super::entry::{ConnectionEntry, ConnectionId};

/// Central registry for all live connections
///
/// Thread-safe via `RwLock`. The broadcast path only takes the read lock,
/// so concurrent fan-outs to different rooms never serialize on each other.
pub struct ConnectionRegistry {
    /// Map of connection id to entry
    connections: RwLock<HashMap<ConnectionId, ConnectionEntry>>,

    /// Next connection id to allocate
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Admit a new connection with no room membership
    ///
    /// `sender` is the handle through which serialized frames reach the
    /// connection's writer task.
    pub async fn register(&self, sender: mpsc::UnboundedSender<Bytes>) -> ConnectionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut connections = self.connections.write().await;
        connections.insert(id, ConnectionEntry::new(sender));

        tracing::debug!(connection_id = id, total = connections.len(), "Connection registered");

        id
    }

    /// Set a connection's current room, replacing any previous membership
    ///
    /// Idempotent for the same room. No-op for an unknown id (the
    /// connection may have unregistered concurrently).
    pub async fn set_room(&self, id: ConnectionId, room: &str) {
        let mut connections = self.connections.write().await;

        if let Some(entry) = connections.get_mut(&id) {
            if entry.room() != Some(room) {
                entry.set_room(room);
                tracing::debug!(connection_id = id, room = room, "Connection joined room");
            }
        }
    }

    /// Remove a connection
    ///
    /// Idempotent: removing an already-removed id is a no-op. Safe to call
    /// while a broadcast is in flight; the broadcast holds cloned send
    /// handles, and sends to a gone connection are skipped.
    pub async fn unregister(&self, id: ConnectionId) {
        let mut connections = self.connections.write().await;

        if connections.remove(&id).is_some() {
            tracing::debug!(connection_id = id, total = connections.len(), "Connection unregistered");
        }
    }

    /// The room a connection has currently joined, if any
    pub async fn current_room(&self, id: ConnectionId) -> Option<String> {
        self.connections
            .read()
            .await
            .get(&id)
            .and_then(|entry| entry.room().map(str::to_owned))
    }

    /// Queue a payload for a single connection
    ///
    /// Returns `false` if the connection is gone or its writer has stopped.
    pub async fn send_to(&self, id: ConnectionId, payload: Bytes) -> bool {
        match self.connections.read().await.get(&id) {
            Some(entry) => entry.send(payload),
            None => false,
        }
    }

    /// Apply `f` to the send handle of every open connection joined to `room`
    ///
    /// Works on a snapshot of matching handles taken under the read lock,
    /// so `f` runs without holding the lock and a connection disappearing
    /// mid-iteration is harmless.
    pub async fn for_each_in_room<F>(&self, room: &str, mut f: F)
    where
        F: FnMut(&mpsc::UnboundedSender<Bytes>),
    {
        let senders: Vec<_> = {
            let connections = self.connections.read().await;
            connections
                .values()
                .filter(|entry| entry.room() == Some(room) && entry.is_open())
                .map(|entry| entry.sender())
                .collect()
        };

        for sender in &senders {
            f(sender);
        }
    }

    /// Number of registered connections
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Whether the registry is empty
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Number of connections currently joined to `room`
    pub async fn room_len(&self, room: &str) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|entry| entry.room() == Some(room))
            .count()
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

    fn channel() -> (mpsc::UnboundedSender<Bytes>, mpsc::UnboundedReceiver<Bytes>) {
        mpsc::unbounded_channel()
    }

    #[tokio::test]
    async fn test_register_starts_unjoined() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = channel();

        let id = registry.register(tx).await;

        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.current_room(id).await, None);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = channel();

        let a = registry.register(tx.clone()).await;
        let b = registry.register(tx).await;

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_set_room_replaces_previous_membership() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = channel();
        let id = registry.register(tx).await;

        registry.set_room(id, "a").await;
        assert_eq!(registry.current_room(id).await.as_deref(), Some("a"));
        assert_eq!(registry.room_len("a").await, 1);

        registry.set_room(id, "b").await;
        assert_eq!(registry.current_room(id).await.as_deref(), Some("b"));
        assert_eq!(registry.room_len("a").await, 0);
        assert_eq!(registry.room_len("b").await, 1);
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = channel();
        let id = registry.register(tx).await;

        registry.unregister(id).await;
        registry.unregister(id).await;

        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_for_each_in_room_filters_by_room() {
        let registry = ConnectionRegistry::new();
        let (tx_a, _rx_a) = channel();
        let (tx_b, _rx_b) = channel();

        let a = registry.register(tx_a).await;
        let b = registry.register(tx_b).await;
        registry.set_room(a, "general").await;
        registry.set_room(b, "other").await;

        let mut visited = 0;
        registry
            .for_each_in_room("general", |_sender| visited += 1)
            .await;

        assert_eq!(visited, 1);
    }

    #[tokio::test]
    async fn test_for_each_in_room_skips_unjoined_and_closed() {
        let registry = ConnectionRegistry::new();

        // Unjoined connection
        let (tx_unjoined, _rx_unjoined) = channel();
        registry.register(tx_unjoined).await;

        // Joined but writer gone
        let (tx_closed, rx_closed) = channel();
        let closed = registry.register(tx_closed).await;
        registry.set_room(closed, "general").await;
        drop(rx_closed);

        let mut visited = 0;
        registry
            .for_each_in_room("general", |_sender| visited += 1)
            .await;

        assert_eq!(visited, 0);
    }

    #[tokio::test]
    async fn test_send_to_unknown_connection() {
        let registry = ConnectionRegistry::new();
        assert!(!registry.send_to(999, Bytes::from_static(b"{}")).await);
    }

    #[tokio::test]
    async fn test_send_to_delivers_payload() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = channel();
        let id = registry.register(tx).await;

        assert!(registry.send_to(id, Bytes::from_static(b"{}")).await);
        assert_eq!(rx.recv().await.unwrap(), Bytes::from_static(b"{}"));
    }
}
