//! Wire shapes of the conversations API and their domain conversions.

use serde::{Deserialize, Serialize};

use crate::domain::{
    conversation::{
        AppointmentRef, Conversation, ConversationId, ConversationSummary, LastMessagePreview,
        Participant, ParticipantRole,
    },
    message::{Message, MessageId, UserId},
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParticipantDto {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<ParticipantDto> for Participant {
    fn from(dto: ParticipantDto) -> Self {
        Self {
            id: UserId(dto.id),
            name: dto.name,
            role: dto
                .role
                .as_deref()
                .map(ParticipantRole::from_wire)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentDto {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub treatment_details: Option<String>,
}

impl From<AppointmentDto> for AppointmentRef {
    fn from(dto: AppointmentDto) -> Self {
        Self {
            date: dto.date,
            time: dto.time,
            treatment_details: dto.treatment_details,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastMessageDto {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default, alias = "time")]
    pub created_at: String,
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Self {
            id: MessageId(dto.id),
            author_id: UserId(dto.user_id),
            author_name: dto.user_name,
            content: dto.content,
            created_at: dto.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationSummaryDto {
    pub id: i64,
    #[serde(default)]
    pub other_user: ParticipantDto,
    #[serde(default)]
    pub appointment: AppointmentDto,
    #[serde(default)]
    pub last_message: Option<LastMessageDto>,
}

impl From<ConversationSummaryDto> for ConversationSummary {
    fn from(dto: ConversationSummaryDto) -> Self {
        Self {
            id: ConversationId(dto.id),
            other_user: dto.other_user.into(),
            appointment: dto.appointment.into(),
            last_message: dto.last_message.map(|last| LastMessagePreview {
                content: last.content,
                created_at: last.created_at,
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationDto {
    pub id: i64,
    #[serde(default)]
    pub other_user: ParticipantDto,
    #[serde(default)]
    pub appointment: AppointmentDto,
    #[serde(default)]
    pub messages: Vec<MessageDto>,
}

impl From<ConversationDto> for Conversation {
    fn from(dto: ConversationDto) -> Self {
        Self {
            id: ConversationId(dto.id),
            other_user: dto.other_user.into(),
            appointment: dto.appointment.into(),
            messages: dto.messages.into_iter().map(Message::from).collect(),
        }
    }
}

/// A history page is either a bare array or wrapped in `{"messages": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessagesPageDto {
    Wrapped { messages: Vec<MessageDto> },
    Bare(Vec<MessageDto>),
}

impl MessagesPageDto {
    pub fn into_messages(self) -> Vec<Message> {
        let messages = match self {
            Self::Wrapped { messages } | Self::Bare(messages) => messages,
        };
        messages.into_iter().map(Message::from).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnreadCountDto {
    #[serde(default)]
    pub unread_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageBody<'a> {
    pub message: MessageContent<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageContent<'a> {
    pub content: &'a str,
}

impl<'a> SendMessageBody<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            message: MessageContent { content },
        }
    }
}
