/// One-way digest of user secrets.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, secret: &str) -> Result<String, PasswordHashError>;

    fn verify(&self, digest: &str, secret: &str) -> Result<bool, PasswordHashError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordHashError {
    #[error("hashing failed: {0}")]
    HashingFailed(String),
    #[error("malformed digest: {0}")]
    MalformedDigest(String),
}
