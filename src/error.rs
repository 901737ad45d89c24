//! Crate-level error types
//!
//! The relay has no fatal application errors in steady state: malformed or
//! invalid frames are dropped, and a failed transport only tears down its
//! own connection. The variants here cover the startup path and
//! per-connection transport failures surfaced to the accept loop.

use std::net::SocketAddr;

/// Error type for relay operations
#[derive(Debug)]
pub enum Error {
    /// Failed to bind the listening socket. Fatal at startup.
    Bind {
        /// Address the listener tried to bind
        addr: SocketAddr,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// I/O error on an accepted connection
    Io(std::io::Error),
    /// WebSocket handshake or protocol error
    WebSocket(tokio_tungstenite::tungstenite::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Bind { addr, source } => {
                write!(f, "Failed to bind {}: {}", addr, source)
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::WebSocket(e) => write!(f, "WebSocket error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Bind { source, .. } => Some(source),
            Error::Io(e) => Some(e),
            Error::WebSocket(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(e)
    }
}

/// Result alias for relay operations
pub type Result<T> = std::result::Result<T, Error>;
