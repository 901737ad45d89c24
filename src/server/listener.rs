//! Relay server listener
//!
//! Handles the TCP accept loop and spawns connection handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::registry::ConnectionRegistry;
use crate::router::Router;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::stats::RelayStats;

/// Room-scoped WebSocket relay server
pub struct RelayServer {
    config: ServerConfig,
    registry: Arc<ConnectionRegistry>,
    history: Arc<HistoryStore>,
    router: Arc<Router>,
    stats: Arc<RelayStats>,
    connection_semaphore: Option<Arc<Semaphore>>,
}

impl RelayServer {
    /// Create a new server with the given configuration
    ///
    /// Registry, history store, and router are constructed here and owned by
    /// the server; nothing is process-global, so tests can run multiple
    /// independent instances.
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let history = Arc::new(HistoryStore::with_capacity(config.history_capacity));
        let stats = Arc::new(RelayStats::new());
        let router = Arc::new(Router::new(
            Arc::clone(&registry),
            Arc::clone(&history),
            Arc::clone(&stats),
        ));

        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        Self {
            config,
            registry,
            history,
            router,
            stats,
            connection_semaphore,
        }
    }

    /// Get a reference to the connection registry
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Get a reference to the history store
    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Get a reference to the relay stats
    pub fn stats(&self) -> &Arc<RelayStats> {
        &self.stats
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down. Failure to bind
    /// the listening socket is the only fatal error.
    pub async fn run(&self) -> Result<()> {
        let listener = self.bind().await?;
        self.accept_loop(&listener).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let listener = self.bind().await?;

        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.accept_loop(&listener) => result,
        }
    }

    async fn bind(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|source| Error::Bind {
                addr: self.config.bind_addr,
                source,
            })?;

        tracing::info!(addr = %self.config.bind_addr, "WebSocket relay listening");

        Ok(listener)
    }

    async fn accept_loop(&self, listener: &TcpListener) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        // Check connection limit
        let permit = if let Some(ref sem) = self.connection_semaphore {
            match sem.clone().try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::warn!(peer = %peer_addr, "Connection rejected: limit reached");
                    return;
                }
            }
        } else {
            None
        };

        tracing::debug!(peer = %peer_addr, "New connection");

        if let Err(e) = self.configure_socket(&socket) {
            tracing::error!(error = %e, "Failed to configure socket");
            return;
        }

        let router = Arc::clone(&self.router);
        let registry = Arc::clone(&self.registry);
        let stats = Arc::clone(&self.stats);

        tokio::spawn(async move {
            // Permit lives as long as the connection
            let _permit = permit;

            let connection = Connection::new(socket, peer_addr, router, registry, stats);

            if let Err(e) = connection.run().await {
                tracing::debug!(peer = %peer_addr, error = %e, "Connection error");
            }
        });
    }

    fn configure_socket(&self, socket: &TcpStream) -> std::io::Result<()> {
        if self.config.tcp_nodelay {
            socket.set_nodelay(true)?;
        }

        Ok(())
    }
}
