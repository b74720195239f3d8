mod identity;
mod rate_limit;

pub use identity::{AuthenticatedUser, require_identity};
pub use rate_limit::{RATE_LIMIT_MESSAGE, client_key, enforce_rate_limit};
