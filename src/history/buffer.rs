//! Bounded message buffer for late-joiner catchup
//!
//! When a client joins a room that already has traffic, it receives the
//! buffered messages before any live ones. The buffer is strict FIFO:
//! appending beyond capacity evicts the single oldest entry, and the
//! relative order of retained messages never changes.

use std::collections::VecDeque;

use crate::protocol::Message;

/// Default number of messages retained per room
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// Ordered, size-capped buffer of past messages for one room
#[derive(Debug)]
pub struct HistoryBuffer {
    /// Maximum number of retained messages
    capacity: usize,
    /// Buffered messages, oldest first
    messages: VecDeque<Message>,
}

impl HistoryBuffer {
    /// Create a buffer with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a buffer with a custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity.min(64)),
        }
    }

    /// Append a message, evicting the oldest entry if over capacity
    ///
    /// Returns the evicted message, if any.
    pub fn push(&mut self, message: Message) -> Option<Message> {
        self.messages.push_back(message);

        if self.messages.len() > self.capacity {
            self.messages.pop_front()
        } else {
            None
        }
    }

    /// Snapshot the buffered messages in insertion order
    pub fn to_vec(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    /// Number of buffered messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The buffer's capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
