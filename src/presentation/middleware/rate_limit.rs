use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::infrastructure::rate_limit::FixedWindowRateLimiter;

use crate::presentation::handlers::ErrorBody;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
const UNKNOWN_CLIENT: &str = "unknown";

pub async fn enforce_rate_limit(
    State(limiter): State<Arc<FixedWindowRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_key = client_key(request.headers(), peer);

    if !limiter.admit(&client_key) {
        tracing::warn!(limiter = limiter.name(), client = %client_key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorBody::new(RATE_LIMIT_MESSAGE)),
        )
            .into_response();
    }

    next.run(request).await
}

/// `X-Real-IP`, then the first `X-Forwarded-For` hop, then the peer address.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(real_ip) = header_value("x-real-ip") {
        return real_ip.to_string();
    }

    if let Some(first_hop) = header_value("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return first_hop.to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
