//! WebSocket relay server
//!
//! TCP accept loop, WebSocket handshake, and per-connection reader/writer
//! tasks. The transport layer carries no application state: everything a
//! connection is (its send handle, its current room) lives in the registry.

pub mod config;
pub mod connection;
pub mod listener;

pub use config::ServerConfig;
pub use listener::RelayServer;
