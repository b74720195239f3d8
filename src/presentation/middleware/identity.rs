use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::services::{AuthError, IdentityGuard};
use crate::domain::UserId;

use crate::presentation::handlers::ErrorBody;

/// The verified caller, inserted by [`require_identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

pub async fn require_identity(
    State(guard): State<Arc<IdentityGuard>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Present but not visible ASCII: malformed, not missing.
    let verdict = match request.headers().get(header::AUTHORIZATION).map(|v| v.to_str()) {
        Some(Err(_)) => Err(AuthError::MalformedCredential),
        Some(Ok(credential)) => guard.authenticate(Some(credential)),
        None => guard.authenticate(None),
    };

    match verdict {
        Ok(user_id) => {
            request.extensions_mut().insert(AuthenticatedUser(user_id));
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected unauthenticated request");
            (StatusCode::UNAUTHORIZED, Json(ErrorBody::new(e.to_string()))).into_response()
        }
    }
}
