//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Tenancy
pub const DEFAULT_TENANT: &str = "default";

// Token lifecycle
pub const ACCESS_TOKEN_SAFETY_MARGIN_SECS: i64 = 60;
pub const DEFAULT_ACCESS_TOKEN_LIFETIME_SECS: i64 = 3600;
pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 30;
pub const REFRESH_LEASE_COOLDOWN_SECS: i64 = 30;
pub const LEASE_RECHECK_DELAY_MS: u64 = 1_500;

// Refresh-expiry warning thresholds (days remaining)
pub const REFRESH_EXPIRY_INFO_DAYS: i64 = 14;
pub const REFRESH_EXPIRY_WARN_DAYS: i64 = 7;
pub const REFRESH_EXPIRY_URGENT_DAYS: i64 = 3;

// Invoice defaults
pub const DEFAULT_DOCUMENT_TYPE: &str = "normal";
pub const DEFAULT_LINE_UNIT: &str = "szt.";
pub const DEFAULT_PAYMENT_DAYS: i64 = 7;
pub const DEFAULT_COUNTRY: &str = "PL";

// Tax identifiers
pub const TAX_ID_LENGTH: usize = 10;

// Remote call budget
pub const REMOTE_CALL_TIMEOUT_SECS: u64 = 30;
pub const REGISTRY_CALL_TIMEOUT_SECS: u64 = 10;

/// Ledger scopes requested by default; profiles may override.
pub const DEFAULT_SCOPES: &[&str] = &[
    "contractors-read",
    "contractors-write",
    "invoice_descriptions-read",
    "invoice_deliveries-read",
    "invoice_deliveries-write",
    "invoices-read",
    "invoices-write",
    "notes-read",
    "notes-write",
    "payments-read",
    "payments-write",
    "tags-read",
    "tags-write",
];
