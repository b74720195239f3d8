use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{AccountError, AuthError, ChatError, HistoryError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Unauthorized(e.to_string())
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::Validation(msg) => ApiError::BadRequest(msg),
            AccountError::EmailTaken => ApiError::Conflict(e.to_string()),
            AccountError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            AccountError::Hashing(ref inner) => {
                tracing::error!(error = %inner, "Password hashing failed");
                ApiError::Internal("Failed to process password".to_string())
            }
            AccountError::Token(ref inner) => {
                tracing::error!(error = %inner, "Token signing failed");
                ApiError::Internal("Failed to generate token".to_string())
            }
            AccountError::Repository(ref inner) => {
                tracing::error!(error = %inner, "Account persistence failed");
                ApiError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Validation(msg) => ApiError::BadRequest(msg),
            ChatError::NotFound => ApiError::NotFound(e.to_string()),
            ChatError::ConversationBusy => ApiError::Conflict(e.to_string()),
            ChatError::Repository(ref inner) => {
                tracing::error!(error = %inner, "Chat persistence failed");
                ApiError::Internal("Failed to save message".to_string())
            }
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(e: HistoryError) -> Self {
        match e {
            HistoryError::NotFound => ApiError::NotFound(e.to_string()),
            HistoryError::Repository(ref inner) => {
                tracing::error!(error = %inner, "History lookup failed");
                ApiError::Internal("Failed to load history".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::BadRequest("Invalid request body".to_string())
    }
}
