//! Port interface for the national business registry

use async_trait::async_trait;
use ledgerflow_domain::{RegistryEntity, Result};

/// Tax-ID search against the business registry
///
/// Lookups are tenant-independent (the registry key is deployment-wide),
/// so the trait carries no tenant argument.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    /// Searches the registry for entities with the given (cleaned) tax
    /// ID. An empty vec is a well-formed "no results" answer; errors are
    /// login or parse failures.
    async fn lookup(&self, tax_id: &str) -> Result<Vec<RegistryEntity>>;
}
