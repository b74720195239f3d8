use crate::domain::User;
use async_trait::async_trait;

use super::RepositoryError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with [`RepositoryError::ConstraintViolation`] when the email is taken.
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError>;

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}
