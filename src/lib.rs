//! Room-scoped WebSocket message relay
//!
//! Clients join a named room over a persistent WebSocket connection,
//! receive that room's recent history, and then exchange short text
//! messages broadcast to every other client currently in the same room.
//!
//! # Components
//!
//! - [`history`] — bounded, ordered message buffer per room
//! - [`registry`] — live connections and their room memberships
//! - [`router`] — parses, validates, and dispatches inbound frames
//! - [`broadcast`] — serialize-once fan-out to a room
//! - [`server`] — TCP accept loop, WebSocket handshake, connection tasks
//!
//! # Example
//!
//! ```no_run
//! use roomcast::{RelayServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> roomcast::Result<()> {
//!     let server = RelayServer::new(ServerConfig::from_env());
//!     server.run().await
//! }
//! ```
//!
//! History is volatile: it lives for the process lifetime and is never
//! persisted. There is no delivery guarantee across restarts, no
//! authentication beyond a free-text display name, and no cross-process
//! coordination; this is a single-process, single-instance relay.

pub mod broadcast;
pub mod error;
pub mod history;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod server;
pub mod stats;

pub use error::{Error, Result};
pub use server::{RelayServer, ServerConfig};
