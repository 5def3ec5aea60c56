//! Request guards

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::context::AppContext;

/// Header carrying the shared caller secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// Routes reachable without the key: liveness, and the browser-driven
/// authorization pair, which cannot carry custom headers.
const EXEMPT_PATHS: &[&str] = &["/health", "/oauth/authorize", "/oauth/callback"];

/// Rejects requests missing the configured API key before any handler runs.
///
/// An absent `server.api_key` disables the guard entirely.
pub async fn require_api_key(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = ctx.config.server.api_key.as_deref() else {
        return next.run(request).await;
    };
    if EXEMPT_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let presented = request.headers().get(API_KEY_HEADER).and_then(|value| value.to_str().ok());
    if presented == Some(expected) {
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "request rejected by the api key guard");
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"type": "Unauthorized", "message": "missing or invalid api key"})),
    )
        .into_response()
}
