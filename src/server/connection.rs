//! Per-connection lifecycle
//!
//! Each accepted socket gets one `Connection`, which performs the WebSocket
//! handshake and then runs two halves: a writer task that owns the sink and
//! drains the connection's outbound channel, and a reader loop that feeds
//! inbound text frames to the router in arrival order.
//!
//! The connection registers itself only after a successful handshake and
//! unregisters exactly once when the reader loop ends, whether through a
//! clean close, a transport error, or the writer half going away.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::{Message as WsMessage, Utf8Bytes};

use crate::error::Result;
use crate::registry::ConnectionRegistry;
use crate::router::Router;
use crate::stats::RelayStats;

/// One live client connection
pub(crate) struct Connection {
    socket: TcpStream,
    peer_addr: SocketAddr,
    router: Arc<Router>,
    registry: Arc<ConnectionRegistry>,
    stats: Arc<RelayStats>,
}

impl Connection {
    pub(crate) fn new(
        socket: TcpStream,
        peer_addr: SocketAddr,
        router: Arc<Router>,
        registry: Arc<ConnectionRegistry>,
        stats: Arc<RelayStats>,
    ) -> Self {
        Self {
            socket,
            peer_addr,
            router,
            registry,
            stats,
        }
    }

    /// Run the connection until the transport closes
    pub(crate) async fn run(self) -> Result<()> {
        let stream = accept_async(self.socket).await?;
        let (mut ws_tx, mut ws_rx) = stream.split();

        let (sender, mut outbound) = mpsc::unbounded_channel::<Bytes>();
        let connection_id = self.registry.register(sender).await;
        self.stats.record_connect();

        tracing::debug!(
            connection_id = connection_id,
            peer = %self.peer_addr,
            "WebSocket established"
        );

        // Writer half: owns the sink, drains the outbound channel
        let mut writer = tokio::spawn(async move {
            while let Some(payload) = outbound.recv().await {
                // Payloads are serialized JSON, always valid UTF-8
                let Ok(text) = Utf8Bytes::try_from(payload) else {
                    continue;
                };

                if ws_tx.send(WsMessage::Text(text)).await.is_err() {
                    break;
                }
            }
        });

        // Reader half: frames from this connection dispatch in arrival order
        loop {
            tokio::select! {
                frame = ws_rx.next() => match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        self.router.dispatch(connection_id, text.as_str()).await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        // Binary frames are not part of the protocol;
                        // ping/pong is answered by the transport layer.
                    }
                    Some(Err(e)) => {
                        tracing::debug!(
                            connection_id = connection_id,
                            error = %e,
                            "Transport error"
                        );
                        break;
                    }
                },
                _ = &mut writer => break,
            }
        }

        self.registry.unregister(connection_id).await;
        self.stats.record_disconnect();
        writer.abort();

        tracing::debug!(connection_id = connection_id, "Connection closed");

        Ok(())
    }
}
