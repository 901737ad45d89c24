//! Inbound frame routing
//!
//! One router instance serves the whole process. Each connection's reader
//! task hands it raw text frames in arrival order; the router parses,
//! validates, updates the registry and history store, and asks the
//! broadcast engine to fan out the result.
//!
//! Per connection the routing state machine is
//! `Unjoined -> Joined(room) -> Closed`, where re-joining moves straight to
//! `Joined(room')` and `Closed` is reached only through transport teardown.
//! The state lives in the connection's registry entry; the router never
//! keeps state of its own.
//!
//! The protocol has no error channel, so nothing a peer sends can produce a
//! reply other than `history` or a relayed `message`. Every rejected frame
//! resolves to [`Dispatch::Ignored`] with a reason, visible to logs and
//! tests but never to the wire.

use std::sync::Arc;

use crate::broadcast::Broadcaster;
use crate::history::HistoryStore;
use crate::protocol::{
    normalize_author, normalize_room, normalize_text, ClientFrame, Message, ServerFrame,
};
use crate::registry::{ConnectionId, ConnectionRegistry};
use crate::stats::RelayStats;

/// Why an inbound frame was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Not a well-formed envelope with a known `type` tag
    Malformed,
    /// Join with an empty room name after normalization
    EmptyRoom,
    /// Message from a connection that never joined a room
    NotJoined,
    /// Message with an empty text after normalization
    EmptyText,
}

/// Outcome of dispatching one inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Join accepted; history reply queued for the joining connection
    History {
        /// Room that was joined
        room: String,
    },
    /// Message appended to history and broadcast to the room
    Relayed {
        /// Room the message was posted to
        room: String,
        /// Number of connections the payload was queued for
        delivered: usize,
    },
    /// Frame dropped with no reply and no state change
    Ignored(DropReason),
}

/// Routes inbound frames to the history store and broadcast engine
pub struct Router {
    registry: Arc<ConnectionRegistry>,
    history: Arc<HistoryStore>,
    broadcaster: Broadcaster,
    stats: Arc<RelayStats>,
}

impl Router {
    /// Create a router over the given registry and history store
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        history: Arc<HistoryStore>,
        stats: Arc<RelayStats>,
    ) -> Self {
        let broadcaster = Broadcaster::new(Arc::clone(&registry));

        Self {
            registry,
            history,
            broadcaster,
            stats,
        }
    }

    /// Dispatch one raw text frame from `connection_id`
    pub async fn dispatch(&self, connection_id: ConnectionId, raw: &str) -> Dispatch {
        let Some(frame) = ClientFrame::parse(raw) else {
            return self.ignore(connection_id, DropReason::Malformed);
        };

        match frame {
            ClientFrame::Join { room } => self.handle_join(connection_id, &room).await,
            ClientFrame::Message { text, author } => {
                self.handle_message(connection_id, &text, author.as_deref())
                    .await
            }
        }
    }

    /// Join: update membership, reply to the joiner with the room's history
    async fn handle_join(&self, connection_id: ConnectionId, raw_room: &str) -> Dispatch {
        let Some(room) = normalize_room(raw_room) else {
            return self.ignore(connection_id, DropReason::EmptyRoom);
        };

        self.registry.set_room(connection_id, &room).await;

        let messages = self.history.get(&room).await;
        let reply = ServerFrame::History {
            room: room.clone(),
            messages,
        };

        match reply.encode() {
            Ok(payload) => {
                // A send handle gone here means the connection is already
                // tearing down; the join itself still happened.
                self.registry.send_to(connection_id, payload).await;
            }
            Err(e) => {
                tracing::error!(connection_id = connection_id, error = %e, "Failed to serialize history reply");
            }
        }

        self.stats.record_join();
        tracing::debug!(connection_id = connection_id, room = %room, "Join accepted");

        Dispatch::History { room }
    }

    /// Message: validate, append to history, broadcast to the room
    async fn handle_message(
        &self,
        connection_id: ConnectionId,
        raw_text: &str,
        raw_author: Option<&str>,
    ) -> Dispatch {
        let Some(room) = self.registry.current_room(connection_id).await else {
            return self.ignore(connection_id, DropReason::NotJoined);
        };

        let Some(text) = normalize_text(raw_text) else {
            return self.ignore(connection_id, DropReason::EmptyText);
        };

        let author = normalize_author(raw_author);
        let message = Message::new(room.clone(), author, text);

        self.history.append(&room, message.clone()).await;
        let delivered = self
            .broadcaster
            .broadcast(&room, &ServerFrame::Message(message))
            .await;

        self.stats.record_relay();
        tracing::debug!(
            connection_id = connection_id,
            room = %room,
            delivered = delivered,
            "Message relayed"
        );

        Dispatch::Relayed { room, delivered }
    }

    fn ignore(&self, connection_id: ConnectionId, reason: DropReason) -> Dispatch {
        self.stats.record_drop();
        tracing::debug!(connection_id = connection_id, reason = ?reason, "Frame dropped");

        Dispatch::Ignored(reason)
    }
}
