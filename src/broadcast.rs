//! Room broadcast engine
//!
//! Serializes a frame once and fans the identical bytes out to every
//! connection currently joined to the target room. `bytes::Bytes` is
//! reference counted, so recipients share one allocation and per-recipient
//! delivery is a pointer clone plus a channel push.
//!
//! Broadcast is fire-and-forget: delivery to a connection whose writer has
//! already stopped is skipped without surfacing an error, and the caller
//! never waits for any recipient.

use std::sync::Arc;

use crate::protocol::ServerFrame;
use crate::registry::ConnectionRegistry;

/// Fan-out of server frames to a room's connections
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    /// Create a broadcaster over the given registry
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver `frame` to every open connection joined to `room`
    ///
    /// Returns the number of connections the payload was queued for.
    pub async fn broadcast(&self, room: &str, frame: &ServerFrame) -> usize {
        let payload = match frame.encode() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(room = room, error = %e, "Failed to serialize broadcast frame");
                return 0;
            }
        };

        let mut delivered = 0;
        self.registry
            .for_each_in_room(room, |sender| {
                if sender.send(payload.clone()).is_ok() {
                    delivered += 1;
                }
            })
            .await;

        tracing::trace!(room = room, delivered = delivered, "Broadcast fanned out");

        delivered
    }
}
