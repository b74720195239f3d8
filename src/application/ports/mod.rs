mod conversation_repository;
mod llm_client;
mod password_hasher;
mod repository_error;
mod token_signer;
mod user_repository;

pub use conversation_repository::ConversationRepository;
pub use llm_client::{LlmClient, LlmClientError, LlmTokenStream};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use repository_error::RepositoryError;
pub use token_signer::{SessionClaims, TokenError, TokenSigner};
pub use user_repository::UserRepository;
