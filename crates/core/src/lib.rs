//! # LedgerFlow Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits)
//! - The token lifecycle manager and credential resolver
//! - The invoice workflow orchestrator
//!
//! ## Architecture Principles
//! - Only depends on `ledgerflow-domain`
//! - No HTTP, filesystem, or vendor-protocol code
//! - All external collaborators behind traits
//! - Pure, testable business logic

pub mod auth;
pub mod workflow;

// Infrastructure ports
pub mod ledger_ports;
pub mod registry_ports;

// Re-export specific items to avoid ambiguity
pub use auth::manager::TokenManager;
pub use auth::ports::{AccessTokenProvider, TokenEndpoint, TokenStore};
pub use auth::profiles::CredentialResolver;
pub use ledger_ports::LedgerClient;
pub use registry_ports::RegistryLookup;
pub use workflow::InvoiceWorkflowService;
