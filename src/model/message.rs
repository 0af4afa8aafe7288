//! Message value types: header, body, and the composed message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Store-assigned message identifier.
///
/// Drawn from a monotonically increasing sequence at enqueue time and never
/// reused, even after the message is deleted or journaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub i64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Header / Body
// ---------------------------------------------------------------------------

/// Immutable metadata assigned when the message is enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub message_id: MessageId,

    /// Optional classifier used for filtered retrieval.
    pub tag: Option<String>,

    pub enqueued_at: DateTime<Utc>,

    /// How many times the message has been claimed, including the current claim.
    pub read_count: u32,
}

/// Text payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub text: String,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Header plus (optional) body.
///
/// The body is a single-pass read: [`Message::take_body`] moves it out, and
/// once the message is finalized through its consumer the store no longer
/// hands it out. Read and use the body before calling `dequeue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub header: Header,
    pub body: Option<Body>,
}

impl Message {
    pub fn new(header: Header, text: impl Into<String>) -> Self {
        Self {
            header,
            body: Some(Body { text: text.into() }),
        }
    }

    pub fn id(&self) -> MessageId {
        self.header.message_id
    }

    pub fn tag(&self) -> Option<&str> {
        self.header.tag.as_deref()
    }

    /// Body text, if it has not been taken.
    pub fn text(&self) -> Option<&str> {
        self.body.as_ref().map(|b| b.text.as_str())
    }

    /// Move the body out. Subsequent calls return `None`.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }

    /// Body text truncated to `max_chars` characters, `...` appended when cut.
    /// An absent body previews as the empty string.
    pub fn preview(&self, max_chars: usize) -> String {
        preview(self.text().unwrap_or(""), max_chars)
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.header.message_id == other.header.message_id
    }
}

impl Eq for Message {}

/// Truncate `text` on a char boundary for log/report output.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(id: i64) -> Header {
        Header {
            message_id: MessageId(id),
            tag: Some("foo".to_string()),
            enqueued_at: Utc::now(),
            read_count: 1,
        }
    }

    #[test]
    fn preview_keeps_short_text() {
        assert_eq!(preview("hello", 50), "hello");
        assert_eq!(preview("", 50), "");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let text = "é".repeat(60);
        let p = preview(&text, 50);
        assert_eq!(p.chars().count(), 53);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn preview_exact_length_is_not_marked() {
        let text = "a".repeat(50);
        assert_eq!(preview(&text, 50), text);
    }

    #[test]
    fn take_body_is_single_read() {
        let mut m = Message::new(header(1), "payload");
        assert_eq!(m.take_body().map(|b| b.text), Some("payload".to_string()));
        assert!(m.take_body().is_none());
        assert_eq!(m.preview(50), "");
    }

    #[test]
    fn equality_is_by_id() {
        let a = Message::new(header(7), "one");
        let b = Message::new(header(7), "two");
        let c = Message::new(header(8), "one");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn header_serializes_id_as_number() {
        let json = serde_json::to_value(header(3)).unwrap();
        assert_eq!(json["message_id"], 3);
        assert_eq!(json["tag"], "foo");
    }
}
