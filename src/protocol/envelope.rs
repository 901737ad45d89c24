//! Tagged wire envelopes
//!
//! Inbound and outbound frames share the `{type, payload}` envelope shape.
//! Inbound frames tolerate missing fields (they normalize to empty strings
//! and get dropped by validation rather than rejected by the parser), which
//! keeps the malformed/invalid distinction where the router can log it.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::message::Message;

/// A frame received from a client
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum ClientFrame {
    /// Join a room (replacing any previous membership)
    Join {
        /// Requested room name, normalized by the router
        #[serde(default)]
        room: String,
    },
    /// Post a message to the currently joined room
    Message {
        /// Message body, normalized by the router
        #[serde(default)]
        text: String,
        /// Optional display name
        #[serde(default)]
        author: Option<String>,
    },
}

impl ClientFrame {
    /// Parse a raw text frame
    ///
    /// Returns `None` for anything that is not a well-formed envelope with a
    /// known `type` tag.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// A frame sent to one or more clients
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum ServerFrame {
    /// Room history, sent to a joining connection only
    History {
        /// Room the history belongs to
        room: String,
        /// Buffered messages, oldest first
        messages: Vec<Message>,
    },
    /// A relayed chat message, broadcast to the room
    Message(Message),
}

impl ServerFrame {
    /// Serialize the frame once into reference-counted bytes
    ///
    /// The returned `Bytes` is cloned per recipient during fan-out; clones
    /// share the same allocation.
    pub fn encode(&self) -> serde_json::Result<Bytes> {
        serde_json::to_vec(self).map(Bytes::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join() {
        let frame = ClientFrame::parse(r#"{"type":"join","payload":{"room":"general"}}"#);
        assert!(matches!(frame, Some(ClientFrame::Join { room }) if room == "general"));
    }

    #[test]
    fn test_parse_join_missing_room() {
        // Missing fields default to empty and fail validation later
        let frame = ClientFrame::parse(r#"{"type":"join","payload":{}}"#);
        assert!(matches!(frame, Some(ClientFrame::Join { room }) if room.is_empty()));
    }

    #[test]
    fn test_parse_message_with_author() {
        let frame =
            ClientFrame::parse(r#"{"type":"message","payload":{"text":"hi","author":"Alice"}}"#);
        match frame {
            Some(ClientFrame::Message { text, author }) => {
                assert_eq!(text, "hi");
                assert_eq!(author.as_deref(), Some("Alice"));
            }
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_parse_message_without_author() {
        let frame = ClientFrame::parse(r#"{"type":"message","payload":{"text":"hi"}}"#);
        assert!(matches!(
            frame,
            Some(ClientFrame::Message { author: None, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert!(ClientFrame::parse(r#"{"type":"typing","payload":{}}"#).is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ClientFrame::parse("not json").is_none());
        assert!(ClientFrame::parse("42").is_none());
        assert!(ClientFrame::parse(r#"{"payload":{}}"#).is_none());
    }

    #[test]
    fn test_encode_history_shape() {
        let frame = ServerFrame::History {
            room: "general".to_owned(),
            messages: vec![Message::new("general", "Alice", "hi")],
        };

        let bytes = frame.encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["type"], "history");
        assert_eq!(value["payload"]["room"], "general");
        assert_eq!(value["payload"]["messages"][0]["text"], "hi");
    }

    #[test]
    fn test_encode_message_shape() {
        let msg = Message::new("general", "Alice", "hi");
        let bytes = ServerFrame::Message(msg.clone()).encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["type"], "message");
        assert_eq!(value["payload"]["id"], msg.id.to_string());
        assert_eq!(value["payload"]["room"], "general");
        assert_eq!(value["payload"]["author"], "Alice");
    }
}
