//! Liveness route

use axum::Json;
use serde_json::{json, Value};

/// `GET /health` - liveness probe, reachable without the api key
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "ledgerflow"}))
}
