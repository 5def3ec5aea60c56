//! Tenant identity and credential profiles

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SCOPES, DEFAULT_TENANT};

/// Identifier of one logical connection to the accounting provider
///
/// Tenants name credential profiles, not users. Unknown identifiers are
/// legal everywhere; resolution coerces them to the default profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The implicit fallback tenant
    pub fn default_tenant() -> Self {
        Self(DEFAULT_TENANT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TenantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::default_tenant()
    }
}

/// Resolved credentials and provider settings for one tenant
///
/// Immutable per deployment. Produced by the credential resolver from
/// configuration; never constructed from request input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialProfile {
    pub tenant: TenantId,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
    /// Provider-side company account selector; appended to ledger calls
    /// when present
    pub company_id: Option<i64>,
}

impl CredentialProfile {
    /// Space-joined scope set as the authorization endpoint expects it
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Whether the profile carries usable client credentials
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// The full default scope set, used when a profile overrides nothing
    pub fn default_scopes() -> Vec<String> {
        DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_string_joins_with_spaces() {
        let profile = CredentialProfile {
            tenant: TenantId::new("acme"),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            scopes: vec!["invoices-read".to_string(), "invoices-write".to_string()],
            company_id: None,
        };

        assert_eq!(profile.scope_string(), "invoices-read invoices-write");
    }

    #[test]
    fn tenant_id_serializes_as_bare_string() {
        let tenant = TenantId::new("acme");
        let json = serde_json::to_string(&tenant).expect("serializes");
        assert_eq!(json, "\"acme\"");

        let back: TenantId = serde_json::from_str("\"acme\"").expect("deserializes");
        assert_eq!(back, tenant);
    }

    #[test]
    fn default_scope_set_covers_invoice_lifecycle() {
        let scopes = CredentialProfile::default_scopes();
        for required in ["contractors-write", "invoices-write", "payments-write"] {
            assert!(scopes.iter().any(|s| s == required), "missing scope {required}");
        }
    }
}
