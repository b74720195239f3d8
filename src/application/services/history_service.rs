use std::sync::Arc;

use tracing::instrument;

use crate::application::ports::{ConversationRepository, RepositoryError};
use crate::domain::{Conversation, ConversationId, Message, UserId};

pub const CONVERSATION_LIST_LIMIT: usize = 50;

/// Read-only access to a user's own conversations.
pub struct HistoryService {
    conversations: Arc<dyn ConversationRepository>,
}

impl HistoryService {
    pub fn new(conversations: Arc<dyn ConversationRepository>) -> Self {
        Self { conversations }
    }

    #[instrument(skip(self), fields(user_id = %user, conversation_id = %conversation_id))]
    pub async fn list_messages(
        &self,
        user: UserId,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, HistoryError> {
        self.conversations
            .find_owned_conversation(conversation_id, user)
            .await?
            .ok_or(HistoryError::NotFound)?;

        Ok(self.conversations.get_messages(conversation_id).await?)
    }

    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn list_conversations(&self, user: UserId) -> Result<Vec<Conversation>, HistoryError> {
        Ok(self
            .conversations
            .list_conversations(user, CONVERSATION_LIST_LIMIT)
            .await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Conversation not found")]
    NotFound,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
