//! Wire protocol for the relay
//!
//! Clients and server exchange JSON envelopes tagged with a `type` field
//! and carrying a `payload`:
//!
//! ```text
//! client -> server   {"type": "join",    "payload": {"room": "general"}}
//! client -> server   {"type": "message", "payload": {"text": "hi", "author": "Alice"}}
//! server -> client   {"type": "history", "payload": {"room": "general", "messages": [...]}}
//! server -> room     {"type": "message", "payload": {"id": ..., "room": ..., ...}}
//! ```
//!
//! The protocol has no error channel. Anything that fails to parse or
//! validate is dropped without a reply, so a hostile or buggy peer cannot
//! disrupt the other connections sharing a room.

pub mod envelope;
pub mod message;

pub use envelope::{ClientFrame, ServerFrame};
pub use message::{
    normalize_author, normalize_room, normalize_text, Message, DEFAULT_AUTHOR, MAX_AUTHOR_CHARS,
    MAX_ROOM_CHARS, MAX_TEXT_CHARS,
};
