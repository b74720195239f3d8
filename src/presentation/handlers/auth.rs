use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::services::Registration;
use crate::presentation::state::AppState;

use super::ApiError;
use super::dto::{AuthResponse, LoginRequest, RegisterRequest};

#[tracing::instrument(skip_all)]
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let session = state
        .account_service
        .register(Registration {
            email: request.email,
            password: request.password,
            name: request.name,
        })
        .await?;

    tracing::info!(user_id = %session.user.id, "User registered");
    Ok((StatusCode::CREATED, Json(AuthResponse::from(session))))
}

#[tracing::instrument(skip_all)]
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload?;
    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let session = state
        .account_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(session.into()))
}
