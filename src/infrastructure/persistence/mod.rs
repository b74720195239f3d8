mod pg_pool;
mod repositories;

pub use repositories::InMemoryConversationRepository;
pub use repositories::InMemoryUserRepository;
pub use repositories::PgConversationRepository;
pub use repositories::PgUserRepository;

pub use pg_pool::{create_pool, run_migrations};
