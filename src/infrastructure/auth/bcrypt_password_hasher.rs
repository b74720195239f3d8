use crate::application::ports::{PasswordHashError, PasswordHasher};

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// bcrypt digests at a configurable work factor.
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, secret: &str) -> Result<String, PasswordHashError> {
        bcrypt::hash(secret, self.cost).map_err(|e| PasswordHashError::HashingFailed(e.to_string()))
    }

    fn verify(&self, digest: &str, secret: &str) -> Result<bool, PasswordHashError> {
        bcrypt::verify(secret, digest).map_err(|e| PasswordHashError::MalformedDigest(e.to_string()))
    }
}
