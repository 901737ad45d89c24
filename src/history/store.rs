//! Room history store
//!
//! Maps room names to their bounded history buffers. Buffers are created
//! lazily on first reference and live for the process lifetime; rooms are
//! never explicitly destroyed.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::buffer::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
use crate::protocol::Message;

/// Store of per-room history buffers
///
/// Thread-safe via `RwLock`. `get` snapshots a buffer under the lock, so a
/// reader observes either the pre- or post-append state of a concurrent
/// `append`, never a partially mutated buffer.
pub struct HistoryStore {
    /// Map of room name to history buffer
    rooms: RwLock<HashMap<String, HistoryBuffer>>,

    /// Capacity applied to newly created buffers
    capacity: usize,
}

impl HistoryStore {
    /// Create a store with the default per-room capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a store with a custom per-room capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Snapshot a room's history in insertion order
    ///
    /// Creates an empty buffer on first access.
    pub async fn get(&self, room: &str) -> Vec<Message> {
        let mut rooms = self.rooms.write().await;

        rooms
            .entry(room.to_owned())
            .or_insert_with(|| HistoryBuffer::with_capacity(self.capacity))
            .to_vec()
    }

    /// Append a message to a room's history
    ///
    /// Evicts the oldest entry when the buffer is over capacity.
    pub async fn append(&self, room: &str, message: Message) {
        let mut rooms = self.rooms.write().await;

        let evicted = rooms
            .entry(room.to_owned())
            .or_insert_with(|| HistoryBuffer::with_capacity(self.capacity))
            .push(message);

        if let Some(old) = evicted {
            tracing::trace!(room = room, evicted_id = %old.id, "History buffer full, oldest evicted");
        }
    }

    /// Number of buffered messages for a room (0 if never referenced)
    pub async fn len(&self, room: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room)
            .map(|b| b.len())
            .unwrap_or(0)
    }

    /// Number of rooms that have been referenced
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_creates_empty_buffer_lazily() {
        let store = HistoryStore::new();

        assert_eq!(store.room_count().await, 0);
        assert!(store.get("general").await.is_empty());
        assert_eq!(store.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_append_then_get_preserves_order() {
        let store = HistoryStore::new();

        for n in 0..10 {
            store
                .append("general", Message::new("general", "Alice", format!("m{}", n)))
                .await;
        }

        let history = store.get("general").await;
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].text, "m0");
        assert_eq!(history[9].text, "m9");
    }

    #[tokio::test]
    async fn test_rooms_are_independent() {
        let store = HistoryStore::new();

        store.append("a", Message::new("a", "Alice", "for a")).await;
        store.append("b", Message::new("b", "Bob", "for b")).await;

        let a = store.get("a").await;
        let b = store.get("b").await;

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(a[0].text, "for a");
        assert_eq!(b[0].text, "for b");
    }

    #[tokio::test]
    async fn test_store_eviction_at_capacity() {
        let store = HistoryStore::with_capacity(5);

        for n in 0..8 {
            store
                .append("x", Message::new("x", "Alice", format!("m{}", n)))
                .await;
        }

        let history = store.get("x").await;
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].text, "m3");
        assert_eq!(history[4].text, "m7");
    }

    #[tokio::test]
    async fn test_len_unreferenced_room() {
        let store = HistoryStore::new();
        assert_eq!(store.len("nowhere").await, 0);
        // len alone must not create the room
        assert_eq!(store.room_count().await, 0);
    }
}
