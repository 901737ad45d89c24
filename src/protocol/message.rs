//! Chat message record and payload normalization
//!
//! All free-text fields arriving from clients pass through the same
//! normalization: trim surrounding whitespace first, then cut to the field's
//! character limit. Truncation counts characters, never bytes, so a
//! multi-byte code point is either kept whole or dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a room name, in characters
pub const MAX_ROOM_CHARS: usize = 64;

/// Maximum length of an author name, in characters
pub const MAX_AUTHOR_CHARS: usize = 32;

/// Maximum length of a message text, in characters
pub const MAX_TEXT_CHARS: usize = 500;

/// Author name used when a client sends none
pub const DEFAULT_AUTHOR: &str = "Guest";

/// A single chat message, immutable once appended to a room's history
///
/// `id` and `timestamp` are assigned server-side at construction; clients
/// only ever supply `author` and `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Server-generated unique id
    pub id: Uuid,
    /// Name of the room this message was posted to
    pub room: String,
    /// Display name of the sender
    pub author: String,
    /// Message body
    pub text: String,
    /// Creation instant, fixed at append time (ISO-8601 on the wire)
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message with a fresh id and the current timestamp
    ///
    /// Callers are expected to pass already-normalized `author` and `text`.
    pub fn new(room: impl Into<String>, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room: room.into(),
            author: author.into(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Trim, then cut to at most `max` characters
fn normalize(raw: &str, max: usize) -> &str {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(max) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    }
}

/// Normalize a room name: trim, truncate to [`MAX_ROOM_CHARS`]
///
/// Returns `None` if nothing is left after normalization; a join with an
/// empty room name is dropped.
pub fn normalize_room(raw: &str) -> Option<String> {
    let room = normalize(raw, MAX_ROOM_CHARS);
    if room.is_empty() {
        None
    } else {
        Some(room.to_owned())
    }
}

/// Normalize an author name: trim, truncate to [`MAX_AUTHOR_CHARS`]
///
/// Falls back to [`DEFAULT_AUTHOR`] when the field is absent or empty after
/// normalization.
pub fn normalize_author(raw: Option<&str>) -> String {
    let author = normalize(raw.unwrap_or(""), MAX_AUTHOR_CHARS);
    if author.is_empty() {
        DEFAULT_AUTHOR.to_owned()
    } else {
        author.to_owned()
    }
}

/// Normalize a message text: trim, truncate to [`MAX_TEXT_CHARS`]
///
/// Returns `None` if nothing is left after normalization; an empty message
/// is dropped.
pub fn normalize_text(raw: &str) -> Option<String> {
    let text = normalize(raw, MAX_TEXT_CHARS);
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_room_trims_and_truncates() {
        assert_eq!(normalize_room("  general  "), Some("general".to_owned()));

        let long = "r".repeat(100);
        let room = normalize_room(&long).unwrap();
        assert_eq!(room.chars().count(), MAX_ROOM_CHARS);
    }

    #[test]
    fn test_normalize_room_empty() {
        assert_eq!(normalize_room(""), None);
        assert_eq!(normalize_room("   "), None);
        assert_eq!(normalize_room("\t\n"), None);
    }

    #[test]
    fn test_normalize_author_default() {
        assert_eq!(normalize_author(None), DEFAULT_AUTHOR);
        assert_eq!(normalize_author(Some("")), DEFAULT_AUTHOR);
        assert_eq!(normalize_author(Some("   ")), DEFAULT_AUTHOR);
    }

    #[test]
    fn test_normalize_author_truncates_to_exactly_32() {
        let long = "a".repeat(50);
        let author = normalize_author(Some(&long));
        assert_eq!(author.chars().count(), MAX_AUTHOR_CHARS);
    }

    #[test]
    fn test_normalize_text_truncates_to_exactly_500() {
        let long = "x".repeat(501);
        let text = normalize_text(&long).unwrap();
        assert_eq!(text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_normalize_text_whitespace_only() {
        assert_eq!(normalize_text("   \n\t  "), None);
    }

    #[test]
    fn test_normalize_trims_before_truncating() {
        // 2 leading spaces + 32 'a's: trimming first leaves all 32 intact
        let padded = format!("  {}", "a".repeat(32));
        assert_eq!(normalize_author(Some(&padded)), "a".repeat(32));
    }

    #[test]
    fn test_normalize_multibyte_boundary() {
        // Truncation must not split a code point
        let emoji = "😀".repeat(40);
        let author = normalize_author(Some(&emoji));
        assert_eq!(author.chars().count(), MAX_AUTHOR_CHARS);
        assert_eq!(author, "😀".repeat(32));
    }

    #[test]
    fn test_message_new_assigns_id_and_timestamp() {
        let a = Message::new("general", "Alice", "hi");
        let b = Message::new("general", "Alice", "hi");

        assert_ne!(a.id, b.id);
        assert_eq!(a.room, "general");
        assert_eq!(a.author, "Alice");
        assert_eq!(a.text, "hi");
    }

    #[test]
    fn test_message_serializes_timestamp_as_iso8601() {
        let msg = Message::new("general", "Alice", "hi");
        let value = serde_json::to_value(&msg).unwrap();

        let ts = value["timestamp"].as_str().unwrap();
        // RFC 3339 round-trip
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        assert!(value["id"].is_string());
    }
}
