use saas_dashboard::application::ports::{PasswordHashError, PasswordHasher};
use saas_dashboard::infrastructure::auth::BcryptPasswordHasher;

#[test]
fn given_hashed_password_when_verifying_then_only_original_matches() {
    let hasher = BcryptPasswordHasher::new(4);

    let digest = hasher.hash("secret123").expect("hash");

    assert!(digest.starts_with("$2"));
    assert_eq!(hasher.verify(&digest, "secret123").ok(), Some(true));
    assert_eq!(hasher.verify(&digest, "secret124").ok(), Some(false));
}

#[test]
fn given_garbage_digest_when_verifying_then_malformed_digest() {
    let hasher = BcryptPasswordHasher::new(4);

    let result = hasher.verify("plain-text", "secret123");

    assert!(matches!(result, Err(PasswordHashError::MalformedDigest(_))));
}
