use super::{ConversationId, UserId};
use chrono::{DateTime, Utc};

pub const TITLE_MAX_CHARS: usize = 50;
const TITLE_ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: ConversationId,
    pub owner: UserId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Starts a conversation titled after its opening message.
    pub fn start(owner: UserId, first_message: &str) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            owner,
            title: derive_title(first_message),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }
}

/// Titles longer than [`TITLE_MAX_CHARS`] keep their first 47 characters
/// followed by `...`, so the result is never longer than the limit.
pub fn derive_title(first_message: &str) -> String {
    if first_message.chars().count() <= TITLE_MAX_CHARS {
        return first_message.to_string();
    }

    let keep = TITLE_MAX_CHARS - TITLE_ELLIPSIS.len();
    let mut title: String = first_message.chars().take(keep).collect();
    title.push_str(TITLE_ELLIPSIS);
    title
}
