use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;

use crate::domain::Message;

/// Incremental text fragments in upstream order. The stream ends when the
/// upstream signals completion; an `Err` item is terminal.
pub type LlmTokenStream = Pin<Box<dyn Stream<Item = Result<String, LlmClientError>> + Send>>;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Opens a streaming completion over the full conversation history.
    async fn complete_stream(&self, history: &[Message]) -> Result<LlmTokenStream, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),
}
