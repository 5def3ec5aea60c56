//! Router assembly

pub mod auth;
pub mod health;
pub mod invoices;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::context::AppContext;
use crate::guards;

/// Builds the application router with the api-key guard layered on top
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/oauth/authorize", get(auth::authorize))
        .route("/oauth/callback", get(auth::callback))
        .route("/oauth/status", get(auth::status))
        .route("/invoices", post(invoices::create))
        .layer(middleware::from_fn_with_state(ctx.clone(), guards::require_api_key))
        .with_state(ctx)
}
