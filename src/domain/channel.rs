use std::fmt;

use super::{
    conversation::ConversationId,
    message::{Message, UserId},
};

/// Logical realtime topic of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicKind {
    Message,
    Typing,
}

impl TopicKind {
    pub const ALL: [TopicKind; 2] = [TopicKind::Message, TopicKind::Typing];

    /// Broker channel class the topic is served by.
    pub fn channel_name(self) -> &'static str {
        match self {
            Self::Message => "ChatChannel",
            Self::Typing => "TypingChannel",
        }
    }

    pub fn from_channel_name(name: &str) -> Option<Self> {
        match name {
            "ChatChannel" => Some(Self::Message),
            "TypingChannel" => Some(Self::Typing),
            _ => None,
        }
    }

    fn key_prefix(self) -> &'static str {
        match self {
            Self::Message => "chat",
            Self::Typing => "typing",
        }
    }
}

/// Identity of one subscription: at most one live registration per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
    pub kind: TopicKind,
    pub conversation_id: ConversationId,
}

impl SubscriptionKey {
    pub fn new(kind: TopicKind, conversation_id: ConversationId) -> Self {
        Self {
            kind,
            conversation_id,
        }
    }

    pub fn message(conversation_id: ConversationId) -> Self {
        Self::new(TopicKind::Message, conversation_id)
    }

    pub fn typing(conversation_id: ConversationId) -> Self {
        Self::new(TopicKind::Typing, conversation_id)
    }
}

impl fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.key_prefix(), self.conversation_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingPing {
    pub user_id: UserId,
}

/// Broker-side state of a single subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Connected,
    Rejected,
    Disconnected,
}

/// Inbound realtime event, one variant per topic kind plus lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Message {
        conversation_id: ConversationId,
        message: Message,
    },
    Typing {
        conversation_id: ConversationId,
        ping: TypingPing,
    },
    Lifecycle {
        key: SubscriptionKey,
        status: ChannelStatus,
    },
}

impl ChannelEvent {
    pub fn conversation_id(&self) -> ConversationId {
        match self {
            Self::Message {
                conversation_id, ..
            }
            | Self::Typing {
                conversation_id, ..
            } => *conversation_id,
            Self::Lifecycle { key, .. } => key.conversation_id,
        }
    }
}
