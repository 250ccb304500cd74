use std::fmt;

use super::message::{Message, UserId};

/// Server-assigned conversation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a conversation participant as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParticipantRole {
    #[default]
    Patient,
    Professional,
    Secretary,
    Other(String),
}

impl ParticipantRole {
    pub fn from_wire(role: &str) -> Self {
        match role {
            "patient" => Self::Patient,
            "professional" => Self::Professional,
            "secretary" => Self::Secretary,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn display_label(&self) -> &str {
        match self {
            Self::Patient => "Patient",
            Self::Professional => "Professional",
            Self::Secretary => "Secretary",
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: UserId,
    pub name: String,
    pub role: ParticipantRole,
}

/// The appointment a conversation was opened for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppointmentRef {
    pub date: String,
    pub time: Option<String>,
    pub treatment_details: Option<String>,
}

impl AppointmentRef {
    /// One-line description such as `Cleaning - 2025-11-03 10:30`.
    pub fn headline(&self) -> String {
        let when = match &self.time {
            Some(time) => format!("{} {}", self.date, time),
            None => self.date.clone(),
        };

        match &self.treatment_details {
            Some(treatment) if !treatment.is_empty() => format!("{treatment} - {when}"),
            _ => when,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastMessagePreview {
    pub content: String,
    pub created_at: String,
}

/// Entry of the conversation list, in the order the server returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub other_user: Participant,
    pub appointment: AppointmentRef,
    pub last_message: Option<LastMessagePreview>,
}

/// A conversation with its full message history.
///
/// The local participant is not part of the payload; it is known from the
/// credential the session was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: ConversationId,
    pub other_user: Participant,
    pub appointment: AppointmentRef,
    pub messages: Vec<Message>,
}
