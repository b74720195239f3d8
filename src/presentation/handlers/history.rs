use axum::extract::{Query, State};
use axum::{Extension, Json};

use crate::domain::ConversationId;
use crate::presentation::middleware::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::ApiError;
use super::dto::{ConversationsResponse, HistoryQuery, HistoryResponse};

#[tracing::instrument(skip_all, fields(user_id = %user))]
pub async fn history_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let raw_id = query
        .conversation_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("conversationId is required".to_string()))?;
    let conversation_id = parse_conversation_id(&raw_id)?;

    let messages = state
        .history_service
        .list_messages(user, conversation_id)
        .await?;

    Ok(Json(HistoryResponse {
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

#[tracing::instrument(skip_all, fields(user_id = %user))]
pub async fn conversations_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Json<ConversationsResponse>, ApiError> {
    let conversations = state.history_service.list_conversations(user).await?;

    Ok(Json(ConversationsResponse {
        conversations: conversations.into_iter().map(Into::into).collect(),
    }))
}

pub(super) fn parse_conversation_id(raw: &str) -> Result<ConversationId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid conversation ID".to_string()))
}
