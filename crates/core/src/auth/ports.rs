//! Port interfaces for token persistence and the OAuth2 endpoint
//!
//! These traits define the boundaries between the token lifecycle logic
//! and infrastructure implementations.

use async_trait::async_trait;
use ledgerflow_domain::{
    CredentialProfile, RefreshLease, Result, TenantId, TokenGrant, TokenRecord,
};

/// Durable per-tenant token persistence
///
/// Single-key reads and writes only; no transactions. Implementations
/// must survive process restart (the in-memory variant exists for tests
/// and embedding).
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the current token record for a tenant
    async fn load_record(&self, tenant: &TenantId) -> Result<Option<TokenRecord>>;

    /// Persist a token record, replacing any previous one
    async fn save_record(&self, tenant: &TenantId, record: &TokenRecord) -> Result<()>;

    /// Load the refresh lease for a tenant, if any was ever written
    async fn load_lease(&self, tenant: &TenantId) -> Result<Option<RefreshLease>>;

    /// Record a refresh lease; last writer wins
    async fn save_lease(&self, tenant: &TenantId, lease: &RefreshLease) -> Result<()>;
}

/// The external OAuth2 token endpoint
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchange an authorization code for a grant
    async fn exchange_code(&self, profile: &CredentialProfile, code: &str) -> Result<TokenGrant>;

    /// Redeem a refresh token for a new grant
    async fn refresh(&self, profile: &CredentialProfile, refresh_token: &str)
        -> Result<TokenGrant>;
}

/// Supplies valid access tokens to anything making authenticated calls
///
/// Implemented by the token manager; consumed by the orchestrator and
/// the ledger adapter so neither carries lifecycle logic.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// A currently-valid access token for the tenant, refreshing if
    /// needed. Fails with `AuthUnavailable` when no refresh path exists.
    async fn access_token(&self, tenant: &TenantId) -> Result<String>;
}
