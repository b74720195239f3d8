use super::{ConversationId, MessageId, MessageRole};
use chrono::{DateTime, Utc};

/// A single turn of a conversation. Never updated once written.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(conversation_id: ConversationId, role: MessageRole, content: String) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            role,
            content,
            created_at: Utc::now(),
        }
    }

    pub fn user(conversation_id: ConversationId, content: String) -> Self {
        Self::new(conversation_id, MessageRole::User, content)
    }

    pub fn assistant(conversation_id: ConversationId, content: String) -> Self {
        Self::new(conversation_id, MessageRole::Assistant, content)
    }
}
