use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::{REQUEST_ID_HEADER, request_id_middleware};
use crate::presentation::config::ServerSettings;
use crate::presentation::handlers::{
    charts_handler, chat_handler, conversations_handler, health_handler, history_handler,
    login_handler, metrics_handler, register_handler,
};
use crate::presentation::middleware::{enforce_rate_limit, require_identity};
use crate::presentation::state::AppState;

const CORS_MAX_AGE: Duration = Duration::from_secs(300);

pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let auth_routes = Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limiters.auth.clone(),
            enforce_rate_limit,
        ));

    // Layers wrap bottom-up: identity runs before the limiter.
    let dashboard_routes = Router::new()
        .route("/api/dashboard/metrics", get(metrics_handler))
        .route("/api/dashboard/charts", get(charts_handler))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limiters.dashboard.clone(),
            enforce_rate_limit,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.identity_guard.clone(),
            require_identity,
        ));

    let chat_routes = Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/", post(chat_handler))
        .route("/api/chat/history", get(history_handler))
        .route("/api/chat/conversations", get(conversations_handler))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limiters.chat.clone(),
            enforce_rate_limit,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.identity_guard.clone(),
            require_identity,
        ));

    let request_timeout = Duration::from_secs(state.settings.server.request_timeout_seconds);
    let cors = cors_layer(&state.settings.server);

    Router::new()
        .route("/health", get(health_handler))
        .merge(auth_routes)
        .merge(dashboard_routes)
        .merge(chat_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(server: &ServerSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .allowed_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([header::LINK, HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}
