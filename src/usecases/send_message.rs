//! Use case for sending a message to a conversation.
//!
//! The send response is not rendered: the authoritative copy of the message
//! arrives through the realtime message topic and goes through the reducer
//! like any other inbound frame.

use crate::domain::conversation::ConversationId;

/// Longest accepted message, counted in characters after trimming.
pub const MAX_MESSAGE_CHARS: usize = 500;

const TYPING_PING_FAILED: &str = "TYPING_PING_FAILED";

/// Command to send a message to a specific conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub conversation_id: ConversationId,
    pub text: String,
}

/// Errors that can occur at the source level (REST API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageSourceError {
    /// Credential was rejected.
    Unauthorized,
    /// Conversation does not exist or is not visible to the caller.
    ConversationNotFound,
    /// Service is temporarily unavailable.
    Unavailable,
}

/// Domain-level errors for send message operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Message text is empty after trimming whitespace.
    EmptyMessage,
    /// Message text exceeds [`MAX_MESSAGE_CHARS`].
    TooLong { chars: usize },
    Unauthorized,
    ConversationNotFound,
    TemporarilyUnavailable,
}

/// REST side of messaging: message submission and typing pings.
pub trait MessageSender {
    /// Submits `text` to the conversation. The accepted message is not
    /// returned; it is delivered over the realtime channel.
    fn send_message(
        &self,
        conversation_id: ConversationId,
        text: &str,
    ) -> Result<(), SendMessageSourceError>;

    /// Tells the server the local participant started typing.
    fn send_typing(&self, conversation_id: ConversationId) -> Result<(), SendMessageSourceError>;
}

impl<T: MessageSender + ?Sized> MessageSender for &T {
    fn send_message(
        &self,
        conversation_id: ConversationId,
        text: &str,
    ) -> Result<(), SendMessageSourceError> {
        (*self).send_message(conversation_id, text)
    }

    fn send_typing(&self, conversation_id: ConversationId) -> Result<(), SendMessageSourceError> {
        (*self).send_typing(conversation_id)
    }
}

/// Sends a message to the specified conversation.
///
/// # Errors
/// Returns `SendMessageError::EmptyMessage` or `SendMessageError::TooLong`
/// without touching the network. Maps source errors otherwise.
pub fn send_message(
    sender: &dyn MessageSender,
    command: SendMessageCommand,
) -> Result<(), SendMessageError> {
    let text = validate_text(&command.text)?;

    sender
        .send_message(command.conversation_id, text)
        .map_err(map_source_error)
}

/// Fire-and-forget typing ping. Failures are logged and swallowed.
pub fn send_typing_ping(sender: &dyn MessageSender, conversation_id: ConversationId) {
    if let Err(error) = sender.send_typing(conversation_id) {
        tracing::debug!(
            code = TYPING_PING_FAILED,
            conversation_id = %conversation_id,
            error = ?error,
            "typing ping failed; ignoring"
        );
    }
}

fn validate_text(text: &str) -> Result<&str, SendMessageError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    let chars = text.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(SendMessageError::TooLong { chars });
    }

    Ok(text)
}

fn map_source_error(error: SendMessageSourceError) -> SendMessageError {
    match error {
        SendMessageSourceError::Unauthorized => SendMessageError::Unauthorized,
        SendMessageSourceError::ConversationNotFound => SendMessageError::ConversationNotFound,
        SendMessageSourceError::Unavailable => SendMessageError::TemporarilyUnavailable,
    }
}
