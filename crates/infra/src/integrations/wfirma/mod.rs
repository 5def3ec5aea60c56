//! Accounting ledger integration (wFirma JSON API)
//!
//! The provider speaks JSON over POST for everything, wraps each payload
//! in a module-named envelope, and reports list results as maps keyed by
//! numeric strings. `codec` flattens those quirks; `client` implements
//! the ledger port on top.

pub mod client;
pub mod codec;
pub mod types;

pub use client::WfirmaClient;
