//! Plain-text rendering for the line-based CLI.

use unicode_width::UnicodeWidthStr;

use crate::{
    domain::{
        channel::ChannelStatus,
        conversation::{AppointmentRef, ConversationSummary, Participant},
        message::{Message, UserId},
        status::ConnectionState,
    },
    usecases::{
        chat_session::ChatUpdate,
        send_message::{SendMessageError, MAX_MESSAGE_CHARS},
    },
};

const PREVIEW_CHARS: usize = 48;
const NAME_COLUMN_WIDTH: usize = 32;

pub fn participant_label(participant: &Participant) -> String {
    format!("{} ({})", participant.name, participant.role.display_label())
}

pub fn conversation_line(summary: &ConversationSummary) -> String {
    let preview = summary
        .last_message
        .as_ref()
        .map(|last| truncate(&last.content, PREVIEW_CHARS))
        .unwrap_or_else(|| "no messages yet".to_owned());

    format!(
        "#{:<5} {} {} | {}",
        summary.id,
        pad_to_width(&participant_label(&summary.other_user), NAME_COLUMN_WIDTH),
        summary.appointment.headline(),
        preview
    )
}

pub fn chat_header(other_user: &Participant, appointment: &AppointmentRef) -> String {
    format!(
        "== {} ==\n   {}\n   /quit leave, /older earlier messages, /retry resend, /reconnect after a drop",
        participant_label(other_user),
        appointment.headline()
    )
}

pub fn message_line(message: &Message, self_id: Option<UserId>) -> String {
    let author = if self_id.is_some_and(|id| message.is_authored_by(id)) {
        "me"
    } else if message.author_name.is_empty() {
        "them"
    } else {
        message.author_name.as_str()
    };

    format!("[{}] {}: {}", message.time_label(), author, message.content)
}

/// One line per update worth showing; lifecycle confirmations stay quiet.
pub fn update_line(update: &ChatUpdate, other_name: &str, self_id: UserId) -> Option<String> {
    match update {
        ChatUpdate::MessageAppended(message) => Some(message_line(message, Some(self_id))),
        ChatUpdate::OtherTypingChanged(true) => Some(format!("... {other_name} is typing")),
        ChatUpdate::OtherTypingChanged(false) => None,
        ChatUpdate::ChannelStatus {
            status: ChannelStatus::Connected,
            ..
        } => None,
        ChatUpdate::ChannelStatus {
            key,
            status: ChannelStatus::Rejected,
        } => Some(format!("! subscription {key} was rejected by the server")),
        ChatUpdate::ChannelStatus {
            status: ChannelStatus::Disconnected,
            ..
        } => None,
        ChatUpdate::ConnectionDropped => {
            Some("! connection lost; type /reconnect to resume live updates".to_owned())
        }
    }
}

pub fn send_error_line(error: &SendMessageError) -> String {
    match error {
        SendMessageError::EmptyMessage => "! message is empty".to_owned(),
        SendMessageError::TooLong { chars } => {
            format!("! message has {chars} characters; the limit is {MAX_MESSAGE_CHARS}")
        }
        SendMessageError::Unauthorized => "! not authorized; check the token".to_owned(),
        SendMessageError::ConversationNotFound => "! conversation no longer exists".to_owned(),
        SendMessageError::TemporarilyUnavailable => {
            "! could not send; the draft was kept, /retry to send it again".to_owned()
        }
    }
}

pub fn connection_line(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Connected => "live",
        ConnectionState::Disconnected => "offline",
        ConnectionState::Dropped => "connection lost",
    }
}

/// Pads by terminal display width so wide glyphs keep columns aligned.
fn pad_to_width(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        return text.to_owned();
    }
    format!("{text}{}", " ".repeat(width - used))
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
