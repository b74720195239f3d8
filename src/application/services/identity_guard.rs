use std::sync::Arc;

use tracing::debug;

use crate::application::ports::{TokenError, TokenSigner};
use crate::domain::UserId;

const BEARER_PREFIX: &str = "Bearer ";

/// Turns an `Authorization` header value into an authenticated subject.
pub struct IdentityGuard {
    signer: Arc<dyn TokenSigner>,
}

impl IdentityGuard {
    pub fn new(signer: Arc<dyn TokenSigner>) -> Self {
        Self { signer }
    }

    pub fn authenticate(&self, credential: Option<&str>) -> Result<UserId, AuthError> {
        let header = credential
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .filter(|token| !token.trim().is_empty())
            .ok_or(AuthError::MalformedCredential)?;

        let claims = self.signer.verify(token.trim()).map_err(|e| {
            match &e {
                TokenError::Expired => debug!("Rejected expired session token"),
                other => debug!(error = %other, "Rejected session token"),
            }
            AuthError::InvalidOrExpiredCredential
        })?;

        claims
            .user_id
            .as_deref()
            .and_then(|raw| raw.parse::<UserId>().ok())
            .ok_or(AuthError::MissingSubjectClaim)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingCredential,
    #[error("Invalid authorization format")]
    MalformedCredential,
    #[error("Invalid or expired token")]
    InvalidOrExpiredCredential,
    #[error("Invalid user ID in token")]
    MissingSubjectClaim,
}
