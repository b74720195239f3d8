use crate::domain::{Conversation, ConversationId, Message, UserId};
use async_trait::async_trait;

use super::RepositoryError;

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn create_conversation(&self, conversation: &Conversation)
    -> Result<(), RepositoryError>;

    /// Returns the conversation only when `owner` owns it; a foreign id and a
    /// missing id are indistinguishable.
    async fn find_owned_conversation(
        &self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, RepositoryError>;

    /// Most recently updated first.
    async fn list_conversations(
        &self,
        owner: UserId,
        limit: usize,
    ) -> Result<Vec<Conversation>, RepositoryError>;

    async fn append_message(&self, message: &Message) -> Result<(), RepositoryError>;

    /// Full history, oldest first.
    async fn get_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, RepositoryError>;

    async fn touch_conversation(&self, id: ConversationId) -> Result<(), RepositoryError>;
}
