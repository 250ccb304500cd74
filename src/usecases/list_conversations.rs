use crate::domain::conversation::ConversationSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConversationsOutput {
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationsSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
}

pub trait ConversationsSource {
    fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ConversationsSourceError>;
}

impl<T> ConversationsSource for &T
where
    T: ConversationsSource + ?Sized,
{
    fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ConversationsSourceError> {
        (*self).list_conversations()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListConversationsError {
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
}

/// Lists the caller's conversations in server order (most recently active
/// first). The order is never changed here.
pub fn list_conversations(
    source: &dyn ConversationsSource,
) -> Result<ListConversationsOutput, ListConversationsError> {
    let conversations = source.list_conversations().map_err(map_source_error)?;

    Ok(ListConversationsOutput { conversations })
}

fn map_source_error(error: ConversationsSourceError) -> ListConversationsError {
    match error {
        ConversationsSourceError::Unauthorized => ListConversationsError::Unauthorized,
        ConversationsSourceError::Unavailable => ListConversationsError::TemporarilyUnavailable,
        ConversationsSourceError::InvalidData => ListConversationsError::DataContractViolation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        conversation::{AppointmentRef, ConversationId, Participant, ParticipantRole},
        message::UserId,
    };

    struct StubSource {
        result: Result<Vec<ConversationSummary>, ConversationsSourceError>,
    }

    impl ConversationsSource for StubSource {
        fn list_conversations(
            &self,
        ) -> Result<Vec<ConversationSummary>, ConversationsSourceError> {
            self.result.clone()
        }
    }

    fn summary(id: i64, name: &str) -> ConversationSummary {
        ConversationSummary {
            id: ConversationId(id),
            other_user: Participant {
                id: UserId(id + 100),
                name: name.to_owned(),
                role: ParticipantRole::Professional,
            },
            appointment: AppointmentRef {
                date: "2025-11-03".to_owned(),
                time: Some("10:30".to_owned()),
                treatment_details: None,
            },
            last_message: None,
        }
    }

    #[test]
    fn keeps_server_order() {
        let conversations = vec![summary(9, "Dr. Ruiz"), summary(2, "Dr. Alba"), summary(5, "Ana")];
        let source = StubSource {
            result: Ok(conversations.clone()),
        };

        let output = list_conversations(&source).expect("list should succeed");

        assert_eq!(output.conversations, conversations);
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let source = StubSource { result: Ok(vec![]) };

        let output = list_conversations(&source).expect("list should succeed");

        assert!(output.conversations.is_empty());
    }

    #[test]
    fn maps_source_errors() {
        let cases = [
            (
                ConversationsSourceError::Unauthorized,
                ListConversationsError::Unauthorized,
            ),
            (
                ConversationsSourceError::Unavailable,
                ListConversationsError::TemporarilyUnavailable,
            ),
            (
                ConversationsSourceError::InvalidData,
                ListConversationsError::DataContractViolation,
            ),
        ];

        for (source_error, expected) in cases {
            let source = StubSource {
                result: Err(source_error),
            };
            assert_eq!(list_conversations(&source), Err(expected));
        }
    }
}
