//! Token lifecycle manager
//!
//! One instance serves every tenant. The durable store is the source of
//! truth: validity is judged against what is on disk right now, so
//! concurrent processes converge on the same tokens. Refresh attempts
//! are single-shot; coordination across processes is the advisory lease.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerflow_domain::constants::LEASE_RECHECK_DELAY_MS;
use ledgerflow_domain::{
    LedgerFlowError, RefreshExpiryTier, RefreshLease, Result, TenantId, TokenGrant, TokenRecord,
    TokenStatus,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::auth::ports::{AccessTokenProvider, TokenEndpoint, TokenStore};
use crate::auth::profiles::CredentialResolver;

/// Obtains, refreshes, and persists OAuth2 tokens per tenant
pub struct TokenManager {
    resolver: Arc<CredentialResolver>,
    store: Arc<dyn TokenStore>,
    endpoint: Arc<dyn TokenEndpoint>,
    /// Identifies this process in refresh leases
    holder: String,
    recheck_delay: Duration,
    /// Last expiry tier warned about, per tenant slot
    warned_tiers: Mutex<HashMap<String, RefreshExpiryTier>>,
}

impl TokenManager {
    pub fn new(
        resolver: Arc<CredentialResolver>,
        store: Arc<dyn TokenStore>,
        endpoint: Arc<dyn TokenEndpoint>,
    ) -> Self {
        Self {
            resolver,
            store,
            endpoint,
            holder: uuid::Uuid::new_v4().to_string(),
            recheck_delay: Duration::from_millis(LEASE_RECHECK_DELAY_MS),
            warned_tiers: Mutex::new(HashMap::new()),
        }
    }

    /// Override the lease recheck pause (tests)
    #[must_use]
    pub fn with_recheck_delay(mut self, delay: Duration) -> Self {
        self.recheck_delay = delay;
        self
    }

    /// Returns a currently-valid access token for the tenant.
    ///
    /// Reads the durable store first; a valid stored token is returned
    /// with no network traffic. Otherwise coordinates via the refresh
    /// lease and performs at most one refresh attempt. Any failure on
    /// that path is `AuthUnavailable`: the caller must send the operator
    /// back through the authorization flow.
    pub async fn get_token(&self, tenant: &TenantId) -> Result<String> {
        let profile = self.resolver.resolve(tenant);
        let slot = profile.tenant.clone();
        let now = Utc::now();

        let Some(record) = self.store.load_record(&slot).await? else {
            debug!(tenant = %slot, "no stored authorization");
            return Err(LedgerFlowError::AuthUnavailable(format!(
                "no stored authorization for tenant '{slot}'; complete the authorization flow"
            )));
        };

        self.emit_expiry_warning(&slot, &record, now).await;

        if record.access_token_valid(now) {
            debug!(tenant = %slot, "stored access token still valid");
            return Ok(record.access_token);
        }

        // Access token expired. If another process started a refresh
        // moments ago, wait out the recheck delay and adopt its result.
        if let Some(lease) = self.store.load_lease(&slot).await? {
            if lease.is_active(now) && lease.holder != self.holder {
                debug!(
                    tenant = %slot,
                    lease_holder = %lease.holder,
                    "refresh lease active elsewhere, pausing before re-read"
                );
                tokio::time::sleep(self.recheck_delay).await;

                if let Some(updated) = self.store.load_record(&slot).await? {
                    if updated.access_token_valid(Utc::now()) {
                        info!(tenant = %slot, "adopted concurrently refreshed token");
                        return Ok(updated.access_token);
                    }
                }
            }
        }

        if !record.refresh_token_valid(now) {
            error!(tenant = %slot, "refresh token expired, reauthorization required");
            return Err(LedgerFlowError::AuthUnavailable(format!(
                "refresh token for tenant '{slot}' expired; reauthorization required"
            )));
        }

        // Best-effort signal; a failed lease write must not block the
        // refresh itself.
        let lease = RefreshLease::new(self.holder.clone(), Utc::now());
        if let Err(err) = self.store.save_lease(&slot, &lease).await {
            warn!(tenant = %slot, error = %err, "failed to record refresh lease");
        }

        let grant = self
            .endpoint
            .refresh(&profile, &record.refresh_token)
            .await
            .map_err(|err| {
                error!(tenant = %slot, error = %err, "token refresh failed");
                LedgerFlowError::AuthUnavailable(format!("token refresh failed: {err}"))
            })?;

        let updated =
            TokenRecord::from_grant(grant, Some(record.refresh_token.clone()), Utc::now());
        self.store.save_record(&slot, &updated).await?;
        info!(tenant = %slot, expires_at = %updated.access_expires_at, "access token refreshed");

        self.emit_expiry_warning(&slot, &updated, Utc::now()).await;
        Ok(updated.access_token)
    }

    /// Persists a fresh authorization grant, superseding any stored
    /// record and any in-flight refresh (plain last write).
    pub async fn persist_grant(&self, tenant: &TenantId, grant: TokenGrant) -> Result<TokenRecord> {
        let profile = self.resolver.resolve(tenant);
        let slot = profile.tenant.clone();
        let now = Utc::now();

        let record = TokenRecord::from_grant(grant, None, now);
        self.store.save_record(&slot, &record).await?;
        info!(tenant = %slot, expires_at = %record.access_expires_at, "authorization grant persisted");

        self.emit_expiry_warning(&slot, &record, now).await;
        Ok(record)
    }

    /// Token state snapshot without side effects; never refreshes.
    pub async fn token_status(&self, tenant: &TenantId) -> Result<TokenStatus> {
        let profile = self.resolver.resolve(tenant);
        let slot = profile.tenant.clone();

        match self.store.load_record(&slot).await? {
            Some(record) => Ok(TokenStatus::from_record(slot, &record, Utc::now())),
            None => Ok(TokenStatus::unauthenticated(slot)),
        }
    }

    /// Emits the tiered refresh-expiry warning, once per (tenant, tier)
    /// transition. Returns the tier newly entered, if any.
    async fn emit_expiry_warning(
        &self,
        slot: &TenantId,
        record: &TokenRecord,
        now: DateTime<Utc>,
    ) -> Option<RefreshExpiryTier> {
        let days_left = record.refresh_days_left(now);
        let tier = RefreshExpiryTier::for_days_left(days_left);

        let mut warned = self.warned_tiers.lock().await;
        match tier {
            Some(tier) => {
                if warned.get(slot.as_str()) == Some(&tier) {
                    return None;
                }
                warned.insert(slot.as_str().to_string(), tier);
                drop(warned);

                match tier {
                    RefreshExpiryTier::Info => {
                        info!(tenant = %slot, days_left, "refresh token expiry approaching");
                    }
                    RefreshExpiryTier::Warn => {
                        warn!(tenant = %slot, days_left, "refresh token expires soon");
                    }
                    RefreshExpiryTier::Urgent => {
                        warn!(tenant = %slot, days_left, "refresh token expires imminently, reauthorize now");
                    }
                    RefreshExpiryTier::Expired => {
                        error!(tenant = %slot, "refresh token expired");
                    }
                }
                Some(tier)
            }
            None => {
                warned.remove(slot.as_str());
                None
            }
        }
    }
}

#[async_trait]
impl AccessTokenProvider for TokenManager {
    async fn access_token(&self, tenant: &TenantId) -> Result<String> {
        self.get_token(tenant).await
    }
}
