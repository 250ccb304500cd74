use std::collections::HashSet;

use super::{
    conversation::ConversationId,
    message::{Message, MessageId},
};

/// Result of applying a realtime message to the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    Appended,
    /// An entry with the same id already exists; the existing entry is kept.
    Duplicate,
}

/// Ordered, deduplicated message list of one conversation.
///
/// Ids are unique within the list and entries are never rewritten: when a
/// frame repeats a known id the first-seen entry wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStream {
    conversation_id: ConversationId,
    messages: Vec<Message>,
    seen: HashSet<MessageId>,
}

impl MessageStream {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            messages: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.seen.contains(&id)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Replaces the list wholesale with server history. Safe to repeat, e.g.
    /// after a reconnect. Repeated ids inside the history keep their first
    /// occurrence.
    pub fn replace_history(&mut self, history: Vec<Message>) {
        self.messages.clear();
        self.seen.clear();

        for message in history {
            if self.seen.insert(message.id) {
                self.messages.push(message);
            }
        }
    }

    /// Appends a realtime message unless its id is already present.
    pub fn apply_inbound(&mut self, message: Message) -> InboundOutcome {
        if !self.seen.insert(message.id) {
            return InboundOutcome::Duplicate;
        }

        self.messages.push(message);
        InboundOutcome::Appended
    }

    /// Inserts an older history page in front of the current list, skipping
    /// ids already present. Returns how many messages were inserted.
    pub fn prepend_older(&mut self, page: Vec<Message>) -> usize {
        let older: Vec<Message> = page
            .into_iter()
            .filter(|message| self.seen.insert(message.id))
            .collect();
        let inserted = older.len();

        if inserted > 0 {
            self.messages.splice(0..0, older);
        }

        inserted
    }
}
