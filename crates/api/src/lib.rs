//! # LedgerFlow API
//!
//! Caller-facing HTTP layer.
//!
//! This crate contains:
//! - The axum router and route handlers
//! - The application context (dependency injection)
//! - Request guards and HTTP classification of domain errors
//!
//! ## Architecture
//! - Depends on `ledgerflow-domain`, `ledgerflow-core`, and `ledgerflow-infra`
//! - Wires the layered architecture together
//! - Owns the server binary entry point

pub mod context;
pub mod error;
pub mod guards;
pub mod routes;

// Re-export for convenience
pub use context::AppContext;
pub use error::ApiError;
