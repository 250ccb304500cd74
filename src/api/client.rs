//! Blocking facade over the async reqwest client.
//!
//! Use cases are synchronous; every call here runs to completion on the
//! shared tokio runtime.

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tokio::runtime::Runtime;
use url::Url;

use crate::{
    domain::{
        conversation::{Conversation, ConversationId, ConversationSummary},
        message::Message,
    },
    usecases::{
        list_conversations::{ConversationsSource, ConversationsSourceError},
        load_conversation::{ConversationSource, ConversationSourceError},
        send_message::{MessageSender, SendMessageSourceError},
        unread_count::{UnreadCountSource, UnreadCountSourceError},
    },
};

use super::{
    dto::{
        ConversationDto, ConversationSummaryDto, MessagesPageDto, SendMessageBody,
        UnreadCountDto,
    },
    error::{ApiError, ApiResult, FailureKind},
};

const API_REQUEST_FAILED: &str = "API_REQUEST_FAILED";

/// Bearer-authenticated client for the conversations API.
#[derive(Clone)]
pub struct RestClient {
    runtime: Arc<Runtime>,
    http: Client,
    base_url: String,
    token: String,
}

impl RestClient {
    pub fn new(
        runtime: Arc<Runtime>,
        base_url: &Url,
        token: impl Into<String>,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            runtime,
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let res = self
            .http
            .get(self.endpoint(path))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        let res = ensure_success(res).await?;
        res.json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> ApiResult<()> {
        let mut request = self.http.post(self.endpoint(path)).bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        ensure_success(request.send().await?).await?;
        Ok(())
    }

    pub fn fetch_conversations(&self) -> ApiResult<Vec<ConversationSummary>> {
        let dtos: Vec<ConversationSummaryDto> =
            self.runtime.block_on(self.get_json("conversations", &[]))?;
        Ok(dtos.into_iter().map(ConversationSummary::from).collect())
    }

    pub fn fetch_conversation(&self, id: ConversationId) -> ApiResult<Conversation> {
        let dto: ConversationDto = self
            .runtime
            .block_on(self.get_json(&format!("conversations/{id}"), &[]))?;
        Ok(dto.into())
    }

    pub fn fetch_messages_page(&self, id: ConversationId, page: u32) -> ApiResult<Vec<Message>> {
        let dto: MessagesPageDto = self.runtime.block_on(self.get_json(
            &format!("conversations/{id}/messages"),
            &[("page", page.to_string())],
        ))?;
        Ok(dto.into_messages())
    }

    pub fn post_message(&self, id: ConversationId, content: &str) -> ApiResult<()> {
        self.runtime.block_on(self.post(
            &format!("conversations/{id}/messages"),
            Some(&SendMessageBody::new(content)),
        ))
    }

    pub fn post_typing(&self, id: ConversationId) -> ApiResult<()> {
        self.runtime
            .block_on(self.post::<()>(&format!("conversations/{id}/messages/typing"), None))
    }

    pub fn fetch_unread_count(&self) -> ApiResult<Option<u32>> {
        let dto: UnreadCountDto = self
            .runtime
            .block_on(self.get_json("conversations/unread_count", &[]))?;
        Ok(dto.unread_count)
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

async fn ensure_success(res: Response) -> ApiResult<Response> {
    if res.status().is_success() {
        return Ok(res);
    }

    Err(ApiError::Status {
        status: res.status().as_u16(),
        message: res.text().await.unwrap_or_default(),
    })
}

fn log_failure(operation: &'static str, error: &ApiError) -> FailureKind {
    let kind = error.kind();
    tracing::warn!(
        code = API_REQUEST_FAILED,
        operation,
        kind = ?kind,
        error = %error,
        "api request failed"
    );
    kind
}

impl ConversationsSource for RestClient {
    fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ConversationsSourceError> {
        self.fetch_conversations().map_err(|error| {
            match log_failure("list_conversations", &error) {
                FailureKind::Unauthorized => ConversationsSourceError::Unauthorized,
                FailureKind::InvalidData => ConversationsSourceError::InvalidData,
                FailureKind::NotFound | FailureKind::Unavailable => {
                    ConversationsSourceError::Unavailable
                }
            }
        })
    }
}

fn conversation_source_error(operation: &'static str, error: ApiError) -> ConversationSourceError {
    match log_failure(operation, &error) {
        FailureKind::Unauthorized => ConversationSourceError::Unauthorized,
        FailureKind::NotFound => ConversationSourceError::NotFound,
        FailureKind::InvalidData => ConversationSourceError::InvalidData,
        FailureKind::Unavailable => ConversationSourceError::Unavailable,
    }
}

impl ConversationSource for RestClient {
    fn load_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Conversation, ConversationSourceError> {
        self.fetch_conversation(id)
            .map_err(|error| conversation_source_error("load_conversation", error))
    }

    fn load_messages_page(
        &self,
        id: ConversationId,
        page: u32,
    ) -> Result<Vec<Message>, ConversationSourceError> {
        self.fetch_messages_page(id, page)
            .map_err(|error| conversation_source_error("load_messages_page", error))
    }
}

fn send_source_error(operation: &'static str, error: ApiError) -> SendMessageSourceError {
    match log_failure(operation, &error) {
        FailureKind::Unauthorized => SendMessageSourceError::Unauthorized,
        FailureKind::NotFound => SendMessageSourceError::ConversationNotFound,
        FailureKind::InvalidData | FailureKind::Unavailable => SendMessageSourceError::Unavailable,
    }
}

impl MessageSender for RestClient {
    fn send_message(
        &self,
        conversation_id: ConversationId,
        text: &str,
    ) -> Result<(), SendMessageSourceError> {
        self.post_message(conversation_id, text)
            .map_err(|error| send_source_error("send_message", error))
    }

    fn send_typing(&self, conversation_id: ConversationId) -> Result<(), SendMessageSourceError> {
        self.post_typing(conversation_id)
            .map_err(|error| send_source_error("send_typing", error))
    }
}

impl UnreadCountSource for RestClient {
    fn unread_count(&self) -> Result<Option<u32>, UnreadCountSourceError> {
        unread_count_outcome(self.fetch_unread_count())
    }
}

fn unread_count_outcome(
    result: ApiResult<Option<u32>>,
) -> Result<Option<u32>, UnreadCountSourceError> {
    match result {
        Ok(count) => Ok(count),
        // No conversations yet: nothing unread.
        Err(error) if error.kind() == FailureKind::NotFound => Ok(None),
        Err(error) => Err(match log_failure("unread_count", &error) {
            FailureKind::Unauthorized => UnreadCountSourceError::Unauthorized,
            FailureKind::InvalidData => UnreadCountSourceError::InvalidData,
            FailureKind::NotFound | FailureKind::Unavailable => {
                UnreadCountSourceError::Unavailable
            }
        }),
    }
}
