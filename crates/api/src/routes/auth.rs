//! Authorization routes: the redirect flow and token introspection

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use ledgerflow_core::TokenEndpoint;
use ledgerflow_domain::{LedgerFlowError, TenantId, TokenStatus};
use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::error::ApiError;

fn tenant_from(params: &HashMap<String, String>) -> TenantId {
    params.get("tenant").map_or_else(TenantId::default_tenant, TenantId::new)
}

/// `GET /oauth/authorize?tenant=` - hands the browser to the vendor's
/// authorization page.
///
/// The generated state nonce is remembered so the callback can find its
/// tenant again.
pub async fn authorize(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Redirect, ApiError> {
    let tenant = tenant_from(&params);
    let profile = ctx.resolver.resolve(&tenant);
    if !profile.has_credentials() {
        return Err(ApiError(LedgerFlowError::Config(format!(
            "tenant '{}' has no client credentials configured",
            profile.tenant
        ))));
    }

    // The coerced tenant keys the pending map, so the callback persists
    // into the same slot the token manager reads.
    let state = ctx.begin_authorization(profile.tenant.clone());
    let url = ctx.oauth.authorize_url(&profile, &state)?;
    info!(tenant = %profile.tenant, "authorization round trip started");
    Ok(Redirect::temporary(&url))
}

/// `GET /oauth/callback?code=&state=` - completes the authorization flow.
///
/// Validates the state, exchanges the code, persists the grant, and
/// reports the outcome as a small browser page.
pub async fn callback(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(code) = params.get("code").filter(|code| !code.is_empty()) else {
        return failure_page(StatusCode::BAD_REQUEST, "The provider sent no authorization code.");
    };
    let Some(state) = params.get("state") else {
        return failure_page(StatusCode::BAD_REQUEST, "The provider sent no state value.");
    };
    let Some(tenant) = ctx.take_authorization(state) else {
        warn!("callback carried an unknown or already used state");
        return failure_page(
            StatusCode::BAD_REQUEST,
            "Unknown or expired authorization state. Start the flow again.",
        );
    };

    let profile = ctx.resolver.resolve(&tenant);
    let grant = match ctx.oauth.exchange_code(&profile, code).await {
        Ok(grant) => grant,
        Err(err) => {
            error!(tenant = %tenant, error = %err, "authorization code exchange failed");
            return failure_page(
                StatusCode::BAD_GATEWAY,
                "The provider rejected the code exchange. Check the server log.",
            );
        }
    };

    match ctx.tokens.persist_grant(&tenant, grant).await {
        Ok(record) => {
            info!(
                tenant = %tenant,
                refresh_expires_at = %record.refresh_expires_at,
                "authorization completed"
            );
            success_page(&tenant)
        }
        Err(err) => {
            error!(tenant = %tenant, error = %err, "persisting the grant failed");
            failure_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The grant could not be stored. Check the server log.",
            )
        }
    }
}

/// `GET /oauth/status?tenant=` - token introspection without side effects
pub async fn status(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TokenStatus>, ApiError> {
    let tenant = tenant_from(&params);
    let status = ctx.tokens.token_status(&tenant).await?;
    Ok(Json(status))
}

fn success_page(tenant: &TenantId) -> Response {
    Html(format!(
        "<html><body style=\"font-family: sans-serif; text-align: center; padding-top: 4em;\">\
         <h2>Authorization complete</h2>\
         <p>Tenant <strong>{tenant}</strong> is connected. You can close this window.</p>\
         </body></html>"
    ))
    .into_response()
}

fn failure_page(status: StatusCode, reason: &str) -> Response {
    (
        status,
        Html(format!(
            "<html><body style=\"font-family: sans-serif; text-align: center; padding-top: 4em;\">\
             <h2>Authorization failed</h2>\
             <p>{reason}</p>\
             </body></html>"
        )),
    )
        .into_response()
}
