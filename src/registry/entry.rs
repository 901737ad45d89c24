//! Per-connection registry entry

use bytes::Bytes;
use tokio::sync::mpsc;

/// Unique identifier for a registered connection
///
/// Allocated from a monotonic counter; never reused within a process.
pub type ConnectionId = u64;

/// State for a single live connection
///
/// Holds the opaque send handle feeding the connection's writer task and
/// the room the connection has currently joined. A connection starts
/// unjoined and is removed from the registry when its transport closes.
#[derive(Debug)]
pub struct ConnectionEntry {
    /// Send handle for serialized frames
    sender: mpsc::UnboundedSender<Bytes>,

    /// Currently joined room, `None` until the first accepted join
    room: Option<String>,
}

impl ConnectionEntry {
    /// Create an entry for a freshly admitted, unjoined connection
    pub fn new(sender: mpsc::UnboundedSender<Bytes>) -> Self {
        Self { sender, room: None }
    }

    /// The currently joined room, if any
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// Replace the current room membership
    pub fn set_room(&mut self, room: impl Into<String>) {
        self.room = Some(room.into());
    }

    /// Whether the connection's writer is still accepting frames
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Queue a payload for delivery
    ///
    /// Returns `false` if the writer task is gone; the caller skips the
    /// connection without treating this as an error.
    pub fn send(&self, payload: Bytes) -> bool {
        self.sender.send(payload).is_ok()
    }

    /// Clone the raw send handle
    pub(super) fn sender(&self) -> mpsc::UnboundedSender<Bytes> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_starts_unjoined() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let entry = ConnectionEntry::new(tx);

        assert_eq!(entry.room(), None);
        assert!(entry.is_open());
    }

    #[test]
    fn test_set_room_replaces_membership() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut entry = ConnectionEntry::new(tx);

        entry.set_room("a");
        assert_eq!(entry.room(), Some("a"));

        entry.set_room("b");
        assert_eq!(entry.room(), Some("b"));
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let entry = ConnectionEntry::new(tx);
        drop(rx);

        assert!(!entry.is_open());
        assert!(!entry.send(Bytes::from_static(b"{}")));
    }
}
