//! LedgerFlow server binary
//!
//! Boots tracing, loads configuration, wires the application context,
//! and serves the HTTP surface until a shutdown signal arrives.

use std::process::ExitCode;
use std::sync::Arc;

use ledgerflow_api::{routes, AppContext};
use ledgerflow_domain::{LedgerFlowError, Result};
use ledgerflow_infra::config::loader;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Logging first, so .env discovery and config loading are visible.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded environment from .env"),
        Err(_) => info!("no .env file found, using process environment"),
    }

    if let Err(err) = run().await {
        error!(error = %err, "server exited with error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let config = loader::load()?;
    let bind_addr = config.server.bind_addr.clone();
    if config.server.api_key.is_none() {
        warn!("no api key configured; mutating routes accept anonymous callers");
    }

    let ctx = Arc::new(AppContext::from_config(config)?);
    let app = routes::router(ctx);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| LedgerFlowError::Config(format!("cannot bind {bind_addr}: {err}")))?;
    info!(addr = %bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| LedgerFlowError::Internal(format!("server error: {err}")))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            // Without signal delivery the server just runs until killed.
            error!(error = %err, "cannot listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
