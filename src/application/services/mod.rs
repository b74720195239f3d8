mod account_service;
mod chat_relay_service;
mod conversation_locks;
mod dashboard_service;
mod history_service;
mod identity_guard;

pub use account_service::{AccountError, AccountService, AuthSession, Registration};
pub use chat_relay_service::{ChatError, ChatRelayService, RelaySession};
pub use conversation_locks::{ConversationGuard, ConversationLocks};
pub use dashboard_service::DashboardService;
pub use history_service::{CONVERSATION_LIST_LIMIT, HistoryError, HistoryService};
pub use identity_guard::{AuthError, IdentityGuard};
