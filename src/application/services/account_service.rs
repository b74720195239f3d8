use std::sync::Arc;

use chrono::Duration;
use tracing::{info, instrument, warn};

use crate::application::ports::{
    PasswordHashError, PasswordHasher, RepositoryError, SessionClaims, TokenError, TokenSigner,
    UserRepository,
};
use crate::domain::User;

const MIN_PASSWORD_CHARS: usize = 6;

/// Registration and login.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    signer: Arc<dyn TokenSigner>,
    token_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        signer: Arc<dyn TokenSigner>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            signer,
            token_ttl,
        }
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, AccountError> {
        let Registration {
            email,
            password,
            name,
        } = registration;

        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(AccountError::Validation(
                "Email, password, and name are required".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AccountError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_CHARS
            )));
        }

        if self.users.email_exists(&email).await? {
            return Err(AccountError::EmailTaken);
        }

        let digest = self.hash_password(password).await?;
        let user = User::new(email, name, digest);

        self.users.create_user(&user).await.map_err(|e| match e {
            RepositoryError::ConstraintViolation(_) => AccountError::EmailTaken,
            other => AccountError::Repository(other),
        })?;

        info!(user_id = %user.id, "User registered");
        self.issue_session(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AccountError> {
        if email.is_empty() || password.is_empty() {
            return Err(AccountError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(AccountError::InvalidCredentials);
        };

        if !self
            .verify_password(user.password_digest.clone(), password.to_string())
            .await?
        {
            warn!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        self.issue_session(user)
    }

    fn issue_session(&self, user: User) -> Result<AuthSession, AccountError> {
        let claims = SessionClaims::for_user(user.id, self.token_ttl);
        let token = self.signer.sign(&claims)?;
        Ok(AuthSession { token, user })
    }

    // bcrypt is CPU bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::Hashing(PasswordHashError::HashingFailed(e.to_string())))?
            .map_err(AccountError::Hashing)
    }

    async fn verify_password(&self, digest: String, password: String) -> Result<bool, AccountError> {
        let hasher = Arc::clone(&self.hasher);
        let verdict = tokio::task::spawn_blocking(move || hasher.verify(&digest, &password))
            .await
            .map_err(|e| AccountError::Hashing(PasswordHashError::HashingFailed(e.to_string())))?;

        match verdict {
            Ok(matches) => Ok(matches),
            Err(PasswordHashError::MalformedDigest(reason)) => {
                warn!(reason = %reason, "Stored password digest is unreadable");
                Ok(false)
            }
            Err(e) => Err(AccountError::Hashing(e)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("password hashing: {0}")]
    Hashing(PasswordHashError),
    #[error("token: {0}")]
    Token(#[from] TokenError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
