use std::sync::Arc;

use chrono::Utc;

use saas_dashboard::application::ports::{SessionClaims, TokenSigner};
use saas_dashboard::application::services::{AuthError, IdentityGuard};
use saas_dashboard::domain::UserId;
use saas_dashboard::infrastructure::auth::JwtTokenSigner;

use crate::helpers::{TEST_JWT_SECRET, bearer_for, test_signer};

fn guard() -> IdentityGuard {
    IdentityGuard::new(test_signer())
}

fn sign(claims: &SessionClaims) -> String {
    test_signer().sign(claims).expect("sign")
}

#[test]
fn given_valid_bearer_token_when_authenticating_then_returns_subject() {
    let user = UserId::new();

    let result = guard().authenticate(Some(&bearer_for(user)));

    assert_eq!(result, Ok(user));
}

#[test]
fn given_no_header_when_authenticating_then_missing_credential() {
    assert_eq!(guard().authenticate(None), Err(AuthError::MissingCredential));
    assert_eq!(
        guard().authenticate(Some("")),
        Err(AuthError::MissingCredential)
    );
}

#[test]
fn given_header_without_bearer_prefix_when_authenticating_then_malformed_credential() {
    let token = bearer_for(UserId::new()).replacen("Bearer ", "Token ", 1);

    assert_eq!(
        guard().authenticate(Some(&token)),
        Err(AuthError::MalformedCredential)
    );
    assert_eq!(
        guard().authenticate(Some("Bearer ")),
        Err(AuthError::MalformedCredential)
    );
}

#[test]
fn given_token_signed_with_other_secret_when_authenticating_then_invalid_credential() {
    let foreign = JwtTokenSigner::new("some-other-secret");
    let token = foreign
        .sign(&SessionClaims::for_user(UserId::new(), chrono::Duration::hours(1)))
        .expect("sign");

    let result = guard().authenticate(Some(&format!("Bearer {}", token)));

    assert_eq!(result, Err(AuthError::InvalidOrExpiredCredential));
}

#[test]
fn given_expired_token_when_authenticating_then_invalid_credential() {
    let now = Utc::now().timestamp();
    let token = sign(&SessionClaims {
        user_id: Some(UserId::new().to_string()),
        exp: now - 60,
        iat: now - 120,
    });

    let result = guard().authenticate(Some(&format!("Bearer {}", token)));

    assert_eq!(result, Err(AuthError::InvalidOrExpiredCredential));
}

#[test]
fn given_garbage_token_when_authenticating_then_invalid_credential() {
    let result = guard().authenticate(Some("Bearer not.a.jwt"));

    assert_eq!(result, Err(AuthError::InvalidOrExpiredCredential));
}

#[test]
fn given_token_without_user_id_when_authenticating_then_missing_subject() {
    let now = Utc::now().timestamp();
    let token = sign(&SessionClaims {
        user_id: None,
        exp: now + 3600,
        iat: now,
    });

    let result = guard().authenticate(Some(&format!("Bearer {}", token)));

    assert_eq!(result, Err(AuthError::MissingSubjectClaim));
}

#[test]
fn given_token_with_non_uuid_user_id_when_authenticating_then_missing_subject() {
    let now = Utc::now().timestamp();
    let token = sign(&SessionClaims {
        user_id: Some("user-42".to_string()),
        exp: now + 3600,
        iat: now,
    });

    let result = IdentityGuard::new(Arc::new(JwtTokenSigner::new(TEST_JWT_SECRET)))
        .authenticate(Some(&format!("Bearer {}", token)));

    assert_eq!(result, Err(AuthError::MissingSubjectClaim));
}
