use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;

use crate::application::ports::{ConversationRepository, RepositoryError, UserRepository};
use crate::domain::{Conversation, ConversationId, Message, MessageRole, User, UserId};

/// Process-local conversation store. Messages keep insertion order.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: Mutex<HashMap<ConversationId, Conversation>>,
    messages: Mutex<Vec<Message>>,
    fail_appends_for: Mutex<Option<MessageRole>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later append of `role` fail, to exercise storage errors.
    pub fn fail_appends_for(&self, role: MessageRole) {
        *self.fail_appends_for.lock() = Some(role);
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.lock().len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn conversation(&self, id: ConversationId) -> Option<Conversation> {
        self.conversations.lock().get(&id).cloned()
    }
}

#[async_trait::async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), RepositoryError> {
        let mut conversations = self.conversations.lock();
        if conversations.contains_key(&conversation.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "conversation {} already exists",
                conversation.id
            )));
        }
        conversations.insert(conversation.id, conversation.clone());
        Ok(())
    }

    async fn find_owned_conversation(
        &self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self
            .conversations
            .lock()
            .get(&id)
            .filter(|c| c.is_owned_by(owner))
            .cloned())
    }

    async fn list_conversations(
        &self,
        owner: UserId,
        limit: usize,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let mut owned: Vec<Conversation> = self
            .conversations
            .lock()
            .values()
            .filter(|c| c.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        owned.truncate(limit);
        Ok(owned)
    }

    async fn append_message(&self, message: &Message) -> Result<(), RepositoryError> {
        if *self.fail_appends_for.lock() == Some(message.role) {
            return Err(RepositoryError::QueryFailed("injected failure".to_string()));
        }
        if !self.conversations.lock().contains_key(&message.conversation_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "conversation {} does not exist",
                message.conversation_id
            )));
        }
        self.messages.lock().push(message.clone());
        Ok(())
    }

    async fn get_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, RepositoryError> {
        Ok(self
            .messages
            .lock()
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn touch_conversation(&self, id: ConversationId) -> Result<(), RepositoryError> {
        if let Some(conversation) = self.conversations.lock().get_mut(&id) {
            conversation.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// Process-local user store keyed by email.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock();
        if users.contains_key(&user.email) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "email {} already registered",
                user.email
            )));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.users.lock().contains_key(email))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().get(email).cloned())
    }
}
