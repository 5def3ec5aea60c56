//! Application configuration model
//!
//! Plain data structures deserialized from environment variables or a
//! config file by `ledgerflow-infra`. Every section has a usable default
//! so partial files parse; credential material has no default and must
//! be supplied by the operator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP caller surface settings
    #[serde(default)]
    pub server: ServerConfig,
    /// OAuth2 endpoints of the accounting provider
    #[serde(default)]
    pub oauth: OAuthConfig,
    /// Accounting (ledger) API settings
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Business registry (SOAP) settings
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Durable token store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Per-tenant credential profiles
    #[serde(default)]
    pub tenants: TenantsConfig,
}

/// HTTP server settings for the caller-facing API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the server binds to
    pub bind_addr: String,
    /// Shared secret required in `X-Api-Key` on mutating routes.
    /// `None` disables the guard (local development only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:8080".to_string(), api_key: None }
    }
}

/// OAuth2 endpoint locations
///
/// Defaults point at the production accounting provider. The token URL
/// carries the provider's `oauth_version=2` marker; requests fail with
/// an HTML error page without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Browser-facing authorization page
    pub authorize_url: String,
    /// Token grant endpoint (exchange and refresh)
    pub token_url: String,
    /// Redirect URI registered with the provider
    pub redirect_uri: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            authorize_url: "https://wfirma.pl/oauth2/auth".to_string(),
            token_url: "https://api2.wfirma.pl/oauth2/token?oauth_version=2".to_string(),
            redirect_uri: "http://localhost:8080/oauth/callback".to_string(),
        }
    }
}

/// Accounting API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Base URL of the accounting REST API
    pub base_url: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { base_url: "https://api2.wfirma.pl".to_string() }
    }
}

/// Business registry (SOAP service) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the registry SOAP service
    pub base_url: String,
    /// Operator key passed to the registry login operation
    #[serde(default)]
    pub user_key: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wyszukiwarkaregon.stat.gov.pl/wsBIR/UslugaBIRzewnPubl.svc"
                .to_string(),
            user_key: String::new(),
        }
    }
}

/// Durable token store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one token file per tenant
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: "./tokens".to_string() }
    }
}

/// Credential profiles keyed by tenant identifier
///
/// `default` backs every tenant that has no entry in `profiles`; lookups
/// never fail on an unknown tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TenantsConfig {
    /// Fallback profile for tenants without an explicit entry
    #[serde(default)]
    pub default: TenantProfileConfig,
    /// Explicit per-tenant profiles
    #[serde(default)]
    pub profiles: HashMap<String, TenantProfileConfig>,
}

/// Credentials and provider settings for one tenant
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TenantProfileConfig {
    /// OAuth2 client identifier
    #[serde(default)]
    pub client_id: String,
    /// OAuth2 client secret
    #[serde(default)]
    pub client_secret: String,
    /// Scopes requested during authorization; `None` uses the full
    /// default scope set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    /// Provider-side company account selector, appended to API calls
    /// when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
}
