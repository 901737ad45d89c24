//! Process-wide relay counters
//!
//! Updated from the accept loop and the dispatch path; read for periodic
//! logging and by tests. All counters are relaxed atomics, values are
//! advisory.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one relay process
#[derive(Debug, Default)]
pub struct RelayStats {
    /// Connections ever accepted
    total_connections: AtomicU64,
    /// Currently registered connections
    active_connections: AtomicU64,
    /// Accepted joins (history replies sent)
    joins: AtomicU64,
    /// Messages appended and broadcast
    messages_relayed: AtomicU64,
    /// Inbound frames dropped by validation
    frames_dropped: AtomicU64,
}

/// Point-in-time copy of [`RelayStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Connections ever accepted
    pub total_connections: u64,
    /// Currently registered connections
    pub active_connections: u64,
    /// Accepted joins
    pub joins: u64,
    /// Messages relayed
    pub messages_relayed: u64,
    /// Frames dropped
    pub frames_dropped: u64,
}

impl RelayStats {
    /// Create a zeroed stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted connection
    pub fn record_connect(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a closed connection
    pub fn record_disconnect(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record an accepted join
    pub fn record_join(&self) {
        self.joins.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a relayed message
    pub fn record_relay(&self) {
        self.messages_relayed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dropped frame
    pub fn record_drop(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            joins: self.joins.load(Ordering::Relaxed),
            messages_relayed: self.messages_relayed.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_zeroed() {
        let stats = RelayStats::new();
        let snap = stats.snapshot();

        assert_eq!(snap.total_connections, 0);
        assert_eq!(snap.active_connections, 0);
        assert_eq!(snap.joins, 0);
        assert_eq!(snap.messages_relayed, 0);
        assert_eq!(snap.frames_dropped, 0);
    }

    #[test]
    fn test_connect_disconnect_counts() {
        let stats = RelayStats::new();

        stats.record_connect();
        stats.record_connect();
        stats.record_disconnect();

        let snap = stats.snapshot();
        assert_eq!(snap.total_connections, 2);
        assert_eq!(snap.active_connections, 1);
    }

    #[test]
    fn test_dispatch_counters() {
        let stats = RelayStats::new();

        stats.record_join();
        stats.record_relay();
        stats.record_relay();
        stats.record_drop();

        let snap = stats.snapshot();
        assert_eq!(snap.joins, 1);
        assert_eq!(snap.messages_relayed, 2);
        assert_eq!(snap.frames_dropped, 1);
    }
}
