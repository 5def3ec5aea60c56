//! Invoice creation endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use ledgerflow_domain::{InvoiceResult, WorkflowRequest};
use tracing::info;

use crate::context::AppContext;
use crate::error::ApiError;

/// `POST /invoices` - runs the full invoice workflow for one request.
///
/// The response carries the workflow outcome with the fetched document
/// reduced to its byte count; the bytes themselves stay server-side.
pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<WorkflowRequest>,
) -> Result<Json<InvoiceResult>, ApiError> {
    info!(tenant = %request.tenant, lines = request.lines.len(), "invoice request accepted");
    let result = ctx.workflow.run(request).await?;
    Ok(Json(result))
}
