//! # LedgerFlow Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Configuration loading (environment and file)
//! - HTTP client plumbing shared by all integrations
//! - Durable token stores (filesystem and in-memory)
//! - OAuth2 token endpoint client
//! - External service integrations (accounting ledger, business registry)
//!
//! ## Architecture
//! - Implements traits defined in `ledgerflow-core`
//! - Depends on `ledgerflow-domain` and `ledgerflow-core`
//! - Contains all "impure" code (I/O, remote calls)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod oauth;
pub mod store;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::gus::GusClient;
pub use integrations::wfirma::WfirmaClient;
pub use oauth::OAuthClient;
pub use store::{FileTokenStore, InMemoryTokenStore};
