//! Connection registry for room-scoped fan-out
//!
//! The registry tracks every live connection together with the room it has
//! currently joined. It is the single owner of connection state: the
//! transport layer holds only an opaque id, and all application state hangs
//! off the registry entry.
//!
//! # Architecture
//!
//! ```text
//!                      Arc<ConnectionRegistry>
//!                 ┌──────────────────────────────┐
//!                 │ connections: HashMap<Id,     │
//!                 │   ConnectionEntry {          │
//!                 │     sender: mpsc::Sender,    │
//!                 │     room: Option<String>,    │
//!                 │   }                          │
//!                 │ >                            │
//!                 └──────────────┬───────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!       [Connection]        [Connection]        [Connection]
//!       reader task         reader task         reader task
//!            │                   │                   │
//!            └──► router ──► broadcast ──► for_each_in_room ──► writer tasks
//! ```
//!
//! Fan-out iterates over a snapshot of matching send handles taken under
//! the read lock, so a connection that unregisters mid-broadcast cannot
//! corrupt the iteration; its send handle simply stops accepting.

pub mod entry;
pub mod store;

pub use entry::{ConnectionEntry, ConnectionId};
pub use store::ConnectionRegistry;
