use std::sync::Arc;

use futures::stream::{Stream, StreamExt};
use tracing::{debug, error, info, instrument, warn};

use crate::application::ports::{
    ConversationRepository, LlmClient, LlmClientError, RepositoryError,
};
use crate::domain::{ChatStreamEvent, Conversation, ConversationId, Message, UserId};

use super::conversation_locks::{ConversationGuard, ConversationLocks};

const SAVE_FAILED_MESSAGE: &str = "Error saving response";

/// Relays a chat turn to the upstream model and records both sides of it.
pub struct ChatRelayService {
    conversations: Arc<dyn ConversationRepository>,
    llm_client: Arc<dyn LlmClient>,
    locks: ConversationLocks,
}

impl ChatRelayService {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        llm_client: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            conversations,
            llm_client,
            locks: ConversationLocks::new(),
        }
    }

    /// Validates the turn, resolves or creates the conversation, stores the
    /// user message and loads the history the upstream call needs.
    ///
    /// Nothing is written when this returns a validation, ownership or
    /// busy error.
    #[instrument(skip(self, message), fields(user_id = %user, conversation_id = ?conversation_id))]
    pub async fn open(
        &self,
        user: UserId,
        conversation_id: Option<ConversationId>,
        message: String,
    ) -> Result<RelaySession, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::Validation("Message is required".to_string()));
        }

        let (conversation, guard) = match conversation_id {
            Some(id) => {
                let conversation = self
                    .conversations
                    .find_owned_conversation(id, user)
                    .await?
                    .ok_or(ChatError::NotFound)?;
                let guard = self.acquire(conversation.id)?;
                (conversation, guard)
            }
            None => {
                let conversation = Conversation::start(user, &message);
                let guard = self.acquire(conversation.id)?;
                self.conversations.create_conversation(&conversation).await?;
                info!(conversation_id = %conversation.id, "Conversation created");
                (conversation, guard)
            }
        };

        let user_message = Message::user(conversation.id, message);
        self.conversations.append_message(&user_message).await?;

        let history = self.conversations.get_messages(conversation.id).await?;
        debug!(turns = history.len(), "Loaded conversation history");

        Ok(RelaySession {
            conversation_id: conversation.id,
            history,
            conversations: Arc::clone(&self.conversations),
            llm_client: Arc::clone(&self.llm_client),
            _guard: guard,
        })
    }

    fn acquire(&self, id: ConversationId) -> Result<ConversationGuard, ChatError> {
        self.locks.try_acquire(id).ok_or_else(|| {
            warn!(conversation_id = %id, "Rejected relay: conversation already streaming");
            ChatError::ConversationBusy
        })
    }
}

/// A prepared relay. The upstream call is not made until the event stream is
/// polled, and the conversation stays locked until that stream finishes or is
/// dropped.
pub struct RelaySession {
    conversation_id: ConversationId,
    history: Vec<Message>,
    conversations: Arc<dyn ConversationRepository>,
    llm_client: Arc<dyn LlmClient>,
    _guard: ConversationGuard,
}

impl RelaySession {
    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Yields `start`, each upstream fragment as `content`, then `end` once the
    /// assistant message is stored, or a single `error` and nothing else.
    ///
    /// Fragments are forwarded one at a time; the next upstream read happens
    /// only after the consumer pulls the previous event. Dropping the stream
    /// abandons the turn without storing a partial reply.
    pub fn into_events(self) -> impl Stream<Item = ChatStreamEvent> + Send + 'static {
        let RelaySession {
            conversation_id,
            history,
            conversations,
            llm_client,
            _guard: guard,
        } = self;

        async_stream::stream! {
            let _guard = guard;

            yield ChatStreamEvent::Start { conversation_id };

            let mut token_stream = match llm_client.complete_stream(&history).await {
                Ok(stream) => stream,
                Err(e) => {
                    error!(conversation_id = %conversation_id, error = %e, "Upstream request failed");
                    yield upstream_error_event(&e);
                    return;
                }
            };

            let mut accumulated = String::new();
            let mut fragments = 0usize;
            while let Some(item) = token_stream.next().await {
                match item {
                    Ok(fragment) if fragment.is_empty() => {}
                    Ok(fragment) => {
                        fragments += 1;
                        accumulated.push_str(&fragment);
                        yield ChatStreamEvent::Content { text: fragment };
                    }
                    Err(e) => {
                        error!(
                            conversation_id = %conversation_id,
                            error = %e,
                            fragments,
                            "Upstream stream failed, dropping partial reply"
                        );
                        yield upstream_error_event(&e);
                        return;
                    }
                }
            }

            let reply = Message::assistant(conversation_id, accumulated);
            if let Err(e) = conversations.append_message(&reply).await {
                error!(conversation_id = %conversation_id, error = %e, "Failed to store assistant reply");
                yield ChatStreamEvent::Error { message: SAVE_FAILED_MESSAGE.to_string() };
                return;
            }

            if let Err(e) = conversations.touch_conversation(conversation_id).await {
                warn!(conversation_id = %conversation_id, error = %e, "Failed to refresh conversation timestamp");
            }

            info!(conversation_id = %conversation_id, fragments, "Relay completed");
            yield ChatStreamEvent::End;
        }
    }
}

fn upstream_error_event(error: &LlmClientError) -> ChatStreamEvent {
    let message = match error {
        LlmClientError::RateLimited => "The assistant is busy, please try again shortly",
        _ => "The assistant failed to respond, please try again",
    };
    ChatStreamEvent::Error {
        message: message.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),
    #[error("Conversation not found")]
    NotFound,
    #[error("Conversation is busy")]
    ConversationBusy,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
