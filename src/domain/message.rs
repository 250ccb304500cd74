use std::fmt;

use chrono::{DateTime, FixedOffset};

/// Server-assigned message identifier, unique within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat message. Immutable once it has been appended to a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub author_id: UserId,
    pub author_name: String,
    pub content: String,
    /// Creation timestamp exactly as the server sent it.
    pub created_at: String,
}

impl Message {
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    /// Parses `created_at` as RFC 3339; `None` when the server used another format.
    pub fn created_at_parsed(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created_at).ok()
    }

    /// Short `HH:MM` label for display, falling back to the raw timestamp.
    pub fn time_label(&self) -> String {
        match self.created_at_parsed() {
            Some(at) => at.format("%H:%M").to_string(),
            None => self.created_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(created_at: &str) -> Message {
        Message {
            id: MessageId(1),
            author_id: UserId(7),
            author_name: "Dra. Paz".to_owned(),
            content: "Hola".to_owned(),
            created_at: created_at.to_owned(),
        }
    }

    #[test]
    fn parses_rails_style_timestamps() {
        let message = msg("2025-11-03T10:30:00.000-03:00");

        let parsed = message.created_at_parsed().expect("timestamp should parse");

        assert_eq!(parsed.offset().local_minus_utc(), -3 * 3600);
        assert_eq!(message.time_label(), "10:30");
    }

    #[test]
    fn time_label_falls_back_to_raw_value() {
        let message = msg("10:30");

        assert_eq!(message.created_at_parsed(), None);
        assert_eq!(message.time_label(), "10:30");
    }

    #[test]
    fn authorship_compares_user_ids() {
        let message = msg("10:30");

        assert!(message.is_authored_by(UserId(7)));
        assert!(!message.is_authored_by(UserId(8)));
    }
}
