use chrono::{Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::UserId;

/// Claim set carried by session tokens.
///
/// `user_id` is optional on the way in so that a validly signed token without
/// a subject can be told apart from a forged one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_claim"
    )]
    pub user_id: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl SessionClaims {
    pub fn for_user(user_id: UserId, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id: Some(user_id.to_string()),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

// Non-string values count as absent rather than as a forged token.
fn string_claim<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_string)))
}

pub trait TokenSigner: Send + Sync {
    fn sign(&self, claims: &SessionClaims) -> Result<String, TokenError>;

    /// Checks signature, algorithm and expiry.
    fn verify(&self, token: &str) -> Result<SessionClaims, TokenError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("signing failed: {0}")]
    SigningFailed(String),
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token expired")]
    Expired,
}
