use crate::domain::{
    conversation::{Conversation, ConversationId},
    message::Message,
};

const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMessagesQuery {
    pub conversation_id: ConversationId,
    pub page: u32,
}

impl LoadMessagesQuery {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            page: FIRST_PAGE,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    fn normalized_page(&self) -> u32 {
        self.page.max(FIRST_PAGE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMessagesOutput {
    pub page: u32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
    NotFound,
}

pub trait ConversationSource {
    fn load_conversation(&self, id: ConversationId)
        -> Result<Conversation, ConversationSourceError>;

    fn load_messages_page(
        &self,
        id: ConversationId,
        page: u32,
    ) -> Result<Vec<Message>, ConversationSourceError>;
}

impl<T> ConversationSource for &T
where
    T: ConversationSource + ?Sized,
{
    fn load_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Conversation, ConversationSourceError> {
        (*self).load_conversation(id)
    }

    fn load_messages_page(
        &self,
        id: ConversationId,
        page: u32,
    ) -> Result<Vec<Message>, ConversationSourceError> {
        (*self).load_messages_page(id, page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadConversationError {
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
    ConversationNotFound,
}

/// Loads one conversation with its full message history.
pub fn load_conversation(
    source: &dyn ConversationSource,
    id: ConversationId,
) -> Result<Conversation, LoadConversationError> {
    let conversation = source.load_conversation(id).map_err(map_source_error)?;

    if conversation.id != id {
        tracing::warn!(
            requested = %id,
            received = %conversation.id,
            "conversation id mismatch in server response"
        );
        return Err(LoadConversationError::DataContractViolation);
    }

    Ok(conversation)
}

/// Loads one page of message history; page numbers start at 1 and lower
/// values are treated as the first page.
pub fn load_messages_page(
    source: &dyn ConversationSource,
    query: LoadMessagesQuery,
) -> Result<LoadMessagesOutput, LoadConversationError> {
    let page = query.normalized_page();
    let messages = source
        .load_messages_page(query.conversation_id, page)
        .map_err(map_source_error)?;

    Ok(LoadMessagesOutput { page, messages })
}

fn map_source_error(error: ConversationSourceError) -> LoadConversationError {
    match error {
        ConversationSourceError::Unauthorized => LoadConversationError::Unauthorized,
        ConversationSourceError::Unavailable => LoadConversationError::TemporarilyUnavailable,
        ConversationSourceError::InvalidData => LoadConversationError::DataContractViolation,
        ConversationSourceError::NotFound => LoadConversationError::ConversationNotFound,
    }
}
