//! Token lifecycle records
//!
//! `TokenGrant` is the normalized outcome of a token-endpoint call;
//! `TokenRecord` is the durable per-tenant state derived from it. All
//! expiry arithmetic lives here so stores and clients stay dumb.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    ACCESS_TOKEN_SAFETY_MARGIN_SECS, DEFAULT_ACCESS_TOKEN_LIFETIME_SECS,
    REFRESH_EXPIRY_INFO_DAYS, REFRESH_EXPIRY_URGENT_DAYS, REFRESH_EXPIRY_WARN_DAYS,
    REFRESH_LEASE_COOLDOWN_SECS, REFRESH_TOKEN_LIFETIME_DAYS,
};
use crate::types::tenant::TenantId;

/// Normalized result of a token-endpoint grant (exchange or refresh)
///
/// Optional fields reflect what the provider actually omits: `expires_in`
/// is frequently absent and `refresh_token` is only present when rotated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Durable token state for one tenant
///
/// Mutated in place on every refresh, never deleted. `access_expires_at`
/// already carries the safety margin; a record reporting a valid access
/// token is never observed invalid mid-call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub obtained_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Builds the durable record from a grant.
    ///
    /// Applies the provider's stated lifetime (defaulting when omitted)
    /// minus the safety margin, recomputes the refresh-token expiry, and
    /// keeps `previous_refresh_token` when the provider did not rotate.
    pub fn from_grant(
        grant: TokenGrant,
        previous_refresh_token: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let lifetime = grant.expires_in.unwrap_or(DEFAULT_ACCESS_TOKEN_LIFETIME_SECS);
        let refresh_token = grant
            .refresh_token
            .filter(|t| !t.is_empty())
            .or(previous_refresh_token)
            .unwrap_or_default();

        Self {
            access_token: grant.access_token,
            refresh_token,
            token_type: grant.token_type.unwrap_or_else(|| "Bearer".to_string()),
            scope: grant.scope,
            access_expires_at: now + Duration::seconds(lifetime - ACCESS_TOKEN_SAFETY_MARGIN_SECS),
            refresh_expires_at: now + Duration::days(REFRESH_TOKEN_LIFETIME_DAYS),
            obtained_at: now,
        }
    }

    pub fn access_token_valid(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && now < self.access_expires_at
    }

    pub fn refresh_token_valid(&self, now: DateTime<Utc>) -> bool {
        !self.refresh_token.is_empty() && now < self.refresh_expires_at
    }

    /// Whole days until the refresh token expires, rounded up.
    ///
    /// Half a remaining day still counts as one; zero or negative means
    /// the refresh path is gone.
    pub fn refresh_days_left(&self, now: DateTime<Utc>) -> i64 {
        let secs = self.refresh_expires_at.signed_duration_since(now).num_seconds();
        (secs + 86_399).div_euclid(86_400)
    }
}

/// Advisory refresh coordination record
///
/// A timestamp, not a mutex: holders observing a recent lease pause and
/// re-read instead of refreshing. Last writer wins by design tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshLease {
    pub holder: String,
    pub acquired_at: DateTime<Utc>,
}

impl RefreshLease {
    pub fn new(holder: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self { holder: holder.into(), acquired_at: now }
    }

    /// True while the lease is inside the cooldown window
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.acquired_at).num_seconds() < REFRESH_LEASE_COOLDOWN_SECS
    }
}

/// Severity tier for approaching refresh-token expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshExpiryTier {
    Info,
    Warn,
    Urgent,
    Expired,
}

impl RefreshExpiryTier {
    /// Tier for a number of remaining days; `None` while comfortably far
    /// from expiry.
    pub fn for_days_left(days_left: i64) -> Option<Self> {
        if days_left <= 0 {
            Some(Self::Expired)
        } else if days_left <= REFRESH_EXPIRY_URGENT_DAYS {
            Some(Self::Urgent)
        } else if days_left <= REFRESH_EXPIRY_WARN_DAYS {
            Some(Self::Warn)
        } else if days_left <= REFRESH_EXPIRY_INFO_DAYS {
            Some(Self::Info)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Urgent => "urgent",
            Self::Expired => "expired",
        }
    }
}

/// Introspection snapshot of a tenant's token state
///
/// Computed without triggering a refresh; served to operators by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStatus {
    pub tenant: TenantId,
    pub authenticated: bool,
    pub access_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_refresh_expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_tier: Option<RefreshExpiryTier>,
}

impl TokenStatus {
    /// Status for a tenant with no stored record
    pub fn unauthenticated(tenant: TenantId) -> Self {
        Self {
            tenant,
            authenticated: false,
            access_valid: false,
            access_expires_at: None,
            refresh_expires_at: None,
            days_until_refresh_expiry: None,
            expiry_tier: None,
        }
    }

    pub fn from_record(tenant: TenantId, record: &TokenRecord, now: DateTime<Utc>) -> Self {
        let days_left = record.refresh_days_left(now);
        Self {
            tenant,
            authenticated: record.refresh_token_valid(now),
            access_valid: record.access_token_valid(now),
            access_expires_at: Some(record.access_expires_at),
            refresh_expires_at: Some(record.refresh_expires_at),
            days_until_refresh_expiry: Some(days_left),
            expiry_tier: RefreshExpiryTier::for_days_left(days_left),
        }
    }
}
