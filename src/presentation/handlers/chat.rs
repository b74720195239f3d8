use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{Extension, Json};
use futures::stream::StreamExt;

use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::middleware::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::ApiError;
use super::dto::{ChatRequest, StreamFrame};
use super::history::parse_conversation_id;

/// Opens a relay and streams its events as `data: <json>` frames.
///
/// Validation, ownership and busy errors are plain JSON responses; once the
/// stream has started every failure arrives as a terminal `error` frame.
#[tracing::instrument(skip_all, fields(user_id = %user))]
pub async fn chat_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let conversation_id = match request.conversation_id.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_conversation_id(raw)?),
        _ => None,
    };

    tracing::debug!(prompt = %sanitize_prompt(&request.message), "Processing chat message");

    let session = state
        .chat_relay_service
        .open(user, conversation_id, request.message)
        .await?;

    tracing::info!(conversation_id = %session.conversation_id(), "Relay opened");

    let keep_alive_seconds = state.settings.llm.sse_keep_alive_seconds;
    let events = session.into_events().map(|event| {
        let frame = StreamFrame::from(event);
        let data = serde_json::to_string(&frame).unwrap_or_default();
        Ok::<_, Infallible>(Event::default().data(data))
    });

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(keep_alive_seconds))
            .text("keep-alive"),
    ))
}
