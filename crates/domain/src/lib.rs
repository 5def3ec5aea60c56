//! # LedgerFlow Domain
//!
//! Business domain types and models for LedgerFlow.
//!
//! This crate contains:
//! - Domain data types (TokenRecord, PartyRecord, InvoiceDraft, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Tax-ID and VAT helpers shared by every layer
//!
//! ## Architecture
//! - No dependencies on other LedgerFlow crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
// Re-export the tax-id helpers; callers gate remote lookups on these
pub use utils::tax_id::{clean_tax_id, is_well_formed_tax_id};
