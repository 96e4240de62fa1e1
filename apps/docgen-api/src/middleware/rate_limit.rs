//! Per-IP token-bucket rate limiting (§4.10), backed by the same KV
//! store as the document cache. Not `tower_governor` — that layer only
//! tracks counts in-process, and the spec requires a counter shared
//! across replicas via external KV with fail-open semantics, so this
//! is a small hand-rolled `axum::middleware::from_fn_with_state` layer
//! instead.

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docgen_cache::ratelimit::RateLimitDecision;
use docgen_types::error::{ApiError, ErrorCode};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::state::AppState;

fn client_ip(req: &Request<Body>, connection_addr: SocketAddr) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| connection_addr.ip().to_string())
}

pub async fn enforce(
    State(state): State<Arc<AppState>>,
    ConnectInfo(connection_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(&request, connection_addr);
    let limit = state.config.rate_limit_burst;

    match state.rate_limiter.check(&ip).await {
        RateLimitDecision::Allowed {
            remaining,
            reset_at_unix,
        } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", header_value(limit));
            headers.insert("X-RateLimit-Remaining", header_value(remaining));
            headers.insert("X-RateLimit-Reset", header_value(reset_at_unix));
            response
        }
        RateLimitDecision::Denied { retry_after_seconds } => {
            let body = ApiError::new(
                ErrorCode::Api003RateLimitExceeded,
                "Rate limit exceeded",
                "too many requests from this client; slow down",
            )
            .with_context(serde_json::json!({ "retryAfterSeconds": retry_after_seconds }))
            .to_envelope();

            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            let headers = response.headers_mut();
            headers.insert("Retry-After", header_value(retry_after_seconds));
            headers.insert("X-RateLimit-Limit", header_value(limit));
            headers.insert("X-RateLimit-Remaining", header_value(0u32));
            response
        }
    }
}

fn header_value(value: impl std::fmt::Display) -> HeaderValue {
    HeaderValue::from_str(&value.to_string()).expect("numeric values are always valid header text")
}
