//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for LedgerFlow
///
/// Workflow steps map onto dedicated variants so the orchestrator can decide
/// fatality without inspecting message text. Upstream error bodies are carried
/// verbatim in the payload for operator diagnosis.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum LedgerFlowError {
    /// No usable access token and no valid refresh path; reauthorization
    /// through the redirect flow is required.
    #[error("Authorization unavailable: {0}")]
    AuthUnavailable(String),

    /// The registry login phase failed (no session identifier).
    #[error("Registry login failed: {0}")]
    RegistryLogin(String),

    /// The registry returned a payload that could not be decoded or parsed.
    #[error("Registry response unparseable: {0}")]
    RegistryParse(String),

    /// Every party-resolution path (ledger, registry, manual) was exhausted.
    #[error("No billable party resolved: {0}")]
    NoParty(String),

    /// The ledger rejected party creation; payload is the upstream body.
    #[error("Party creation rejected: {0}")]
    PartyCreateFailed(String),

    /// Caller-supplied line items are malformed; raised before any remote
    /// call.
    #[error("Invalid line item: {0}")]
    InvalidLineItem(String),

    /// The ledger rejected invoice creation.
    #[error("Invoice creation rejected: {0}")]
    InvoiceCreateFailed(String),

    /// Invoice creation failed because the ledger company has no bookkeeping
    /// scheme configured. Distinguished from the generic failure because the
    /// fix is account configuration, not request data.
    #[error("Accounting scheme missing: {0}")]
    AccountingSchemeMissing(String),

    /// Marking the invoice as paid failed; the invoice itself exists.
    #[error("Payment finalization failed: {0}")]
    PaymentFinalizeFailed(String),

    /// Fetching the rendered invoice document failed.
    #[error("Document fetch failed: {0}")]
    DocumentFetchFailed(String),

    /// Dispatching the invoice email failed.
    #[error("Email dispatch failed: {0}")]
    EmailDispatchFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for LedgerFlow operations
pub type Result<T> = std::result::Result<T, LedgerFlowError>;
