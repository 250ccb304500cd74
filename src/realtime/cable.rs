//! Action Cable JSON framing.
//!
//! Client commands are `{"command": "subscribe" | "unsubscribe", "identifier": <json string>}`.
//! Server frames are either typed (`welcome`, `ping`, `confirm_subscription`,
//! `reject_subscription`, `disconnect`) or untyped broadcasts
//! `{"identifier": <json string>, "message": {...}}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    channel::{SubscriptionKey, TopicKind, TypingPing},
    conversation::ConversationId,
    message::{Message, MessageId, UserId},
};

use super::RealtimeError;

pub const CABLE_SUBPROTOCOL: &str = "actioncable-v1-json";

/// Channel parameters. Field order matters: the broker echoes the encoded
/// string back on every frame for this subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelIdentifier {
    pub channel: String,
    pub conversation_id: i64,
}

impl ChannelIdentifier {
    pub fn for_key(key: &SubscriptionKey) -> Self {
        Self {
            channel: key.kind.channel_name().to_owned(),
            conversation_id: key.conversation_id.0,
        }
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"channel":"{}","conversation_id":{}}}"#,
                self.channel, self.conversation_id
            )
        })
    }

    pub fn decode(raw: &str) -> Result<Self, RealtimeError> {
        serde_json::from_str(raw)
            .map_err(|error| RealtimeError::Protocol(format!("bad channel identifier: {error}")))
    }

    pub fn to_key(&self) -> Option<SubscriptionKey> {
        TopicKind::from_channel_name(&self.channel)
            .map(|kind| SubscriptionKey::new(kind, ConversationId(self.conversation_id)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Subscribe,
    Unsubscribe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CableCommand {
    pub command: CommandKind,
    pub identifier: String,
}

impl CableCommand {
    pub fn subscribe(key: &SubscriptionKey) -> Self {
        Self {
            command: CommandKind::Subscribe,
            identifier: ChannelIdentifier::for_key(key).encode(),
        }
    }

    pub fn unsubscribe(key: &SubscriptionKey) -> Self {
        Self {
            command: CommandKind::Unsubscribe,
            identifier: ChannelIdentifier::for_key(key).encode(),
        }
    }

    pub fn to_json(&self) -> Result<String, RealtimeError> {
        serde_json::to_string(self)
            .map_err(|error| RealtimeError::Protocol(format!("unencodable command: {error}")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CableFrame {
    Welcome,
    Ping,
    Confirm {
        identifier: ChannelIdentifier,
    },
    Reject {
        identifier: ChannelIdentifier,
    },
    Disconnect {
        reason: Option<String>,
        reconnect: bool,
    },
    Broadcast {
        identifier: ChannelIdentifier,
        payload: Value,
    },
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: Option<String>,
    identifier: Option<String>,
    message: Option<Value>,
    reason: Option<String>,
    reconnect: Option<bool>,
}

pub fn decode_frame(text: &str) -> Result<CableFrame, RealtimeError> {
    let raw: RawFrame = serde_json::from_str(text)
        .map_err(|error| RealtimeError::Protocol(format!("unparsable frame: {error}")))?;

    match raw.kind.as_deref() {
        Some("welcome") => Ok(CableFrame::Welcome),
        Some("ping") => Ok(CableFrame::Ping),
        Some("confirm_subscription") => Ok(CableFrame::Confirm {
            identifier: required_identifier(raw.identifier)?,
        }),
        Some("reject_subscription") => Ok(CableFrame::Reject {
            identifier: required_identifier(raw.identifier)?,
        }),
        Some("disconnect") => Ok(CableFrame::Disconnect {
            reason: raw.reason,
            reconnect: raw.reconnect.unwrap_or(false),
        }),
        Some(other) => Err(RealtimeError::Protocol(format!(
            "unknown frame type {other}"
        ))),
        None => {
            let identifier = required_identifier(raw.identifier)?;
            let payload = raw
                .message
                .ok_or_else(|| RealtimeError::Protocol("broadcast without message".to_owned()))?;
            Ok(CableFrame::Broadcast {
                identifier,
                payload,
            })
        }
    }
}

fn required_identifier(raw: Option<String>) -> Result<ChannelIdentifier, RealtimeError> {
    let raw =
        raw.ok_or_else(|| RealtimeError::Protocol("frame without identifier".to_owned()))?;
    ChannelIdentifier::decode(&raw)
}

/// Message-topic broadcast body.
#[derive(Debug, Deserialize)]
struct MessagePayload {
    id: i64,
    content: String,
    user_id: i64,
    #[serde(default)]
    user_name: String,
    #[serde(default)]
    created_at: String,
}

/// Typing-topic broadcast body.
#[derive(Debug, Deserialize)]
struct TypingPayload {
    user_id: i64,
}

pub fn decode_message_payload(payload: Value) -> Result<Message, RealtimeError> {
    let body: MessagePayload = serde_json::from_value(payload)
        .map_err(|error| RealtimeError::Protocol(format!("bad message payload: {error}")))?;

    Ok(Message {
        id: MessageId(body.id),
        author_id: UserId(body.user_id),
        author_name: body.user_name,
        content: body.content,
        created_at: body.created_at,
    })
}

pub fn decode_typing_payload(payload: Value) -> Result<TypingPing, RealtimeError> {
    let body: TypingPayload = serde_json::from_value(payload)
        .map_err(|error| RealtimeError::Protocol(format!("bad typing payload: {error}")))?;

    Ok(TypingPing {
        user_id: UserId(body.user_id),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn subscribe_command_embeds_identifier_as_json_string() {
        let command = CableCommand::subscribe(&SubscriptionKey::typing(ConversationId(42)));

        let encoded = command.to_json().expect("command should encode");

        assert_eq!(
            encoded,
            r#"{"command":"subscribe","identifier":"{\"channel\":\"TypingChannel\",\"conversation_id\":42}"}"#
        );
    }

    #[test]
    fn decodes_control_frames() {
        assert_eq!(decode_frame(r#"{"type":"welcome"}"#), Ok(CableFrame::Welcome));
        assert_eq!(
            decode_frame(r#"{"type":"ping","message":1730640000}"#),
            Ok(CableFrame::Ping)
        );
        assert_eq!(
            decode_frame(r#"{"type":"disconnect","reason":"unauthorized","reconnect":false}"#),
            Ok(CableFrame::Disconnect {
                reason: Some("unauthorized".to_owned()),
                reconnect: false
            })
        );
    }

    #[test]
    fn decodes_confirmation_back_to_subscription_key() {
        let frame = decode_frame(
            r#"{"type":"confirm_subscription","identifier":"{\"channel\":\"ChatChannel\",\"conversation_id\":7}"}"#,
        )
        .expect("frame should decode");

        let identifier = match frame {
            CableFrame::Confirm { identifier } => identifier,
            other => panic!("expected confirmation, got {other:?}"),
        };
        assert_eq!(
            identifier.to_key(),
            Some(SubscriptionKey::message(ConversationId(7)))
        );
    }

    #[test]
    fn decodes_message_broadcast_payload() {
        let payload = json!({
            "id": 3,
            "content": "Hola",
            "user_id": 5,
            "user_name": "Ana",
            "created_at": "2025-11-03T10:30:00.000-03:00"
        });
        let message = decode_message_payload(payload).expect("payload should decode");

        assert_eq!(message.id, MessageId(3));
        assert_eq!(message.author_id, UserId(5));
        assert_eq!(message.author_name, "Ana");
        assert_eq!(message.content, "Hola");
    }

    #[test]
    fn broadcast_without_type_carries_raw_payload() {
        let text = json!({
            "identifier": ChannelIdentifier::for_key(&SubscriptionKey::typing(ConversationId(9))).encode(),
            "message": { "user_id": 12 }
        })
        .to_string();

        let frame = decode_frame(&text).expect("frame should decode");

        let (identifier, payload) = match frame {
            CableFrame::Broadcast {
                identifier,
                payload,
            } => (identifier, payload),
            other => panic!("expected broadcast, got {other:?}"),
        };
        assert_eq!(identifier.to_key(), Some(SubscriptionKey::typing(ConversationId(9))));
        assert_eq!(
            decode_typing_payload(payload),
            Ok(TypingPing { user_id: UserId(12) })
        );
    }

    #[test]
    fn rejects_unknown_frame_types_and_garbage() {
        assert!(matches!(
            decode_frame(r#"{"type":"presence"}"#),
            Err(RealtimeError::Protocol(_))
        ));
        assert!(matches!(decode_frame("not json"), Err(RealtimeError::Protocol(_))));
    }

    #[test]
    fn message_payload_without_id_is_a_protocol_error() {
        let payload = json!({ "content": "Hola", "user_id": 5 });

        assert!(matches!(
            decode_message_payload(payload),
            Err(RealtimeError::Protocol(_))
        ));
    }
}
