//! Credential profile resolution
//!
//! Maps tenant identifiers to client credentials and scopes. The map is
//! fixed at startup; unknown tenants coerce to the default profile, so
//! resolution never fails.

use std::collections::HashMap;

use ledgerflow_domain::{CredentialProfile, TenantId, TenantProfileConfig, TenantsConfig};

/// Tenant-to-credentials resolver, built once from configuration
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    default_profile: CredentialProfile,
    profiles: HashMap<String, CredentialProfile>,
}

impl CredentialResolver {
    pub fn from_config(tenants: &TenantsConfig) -> Self {
        let default_profile =
            Self::build_profile(TenantId::default_tenant(), &tenants.default);
        let profiles = tenants
            .profiles
            .iter()
            .map(|(name, cfg)| {
                (name.clone(), Self::build_profile(TenantId::new(name.clone()), cfg))
            })
            .collect();

        Self { default_profile, profiles }
    }

    /// Resolve a tenant to its profile.
    ///
    /// Unknown tenants coerce to the default profile, default tenant key
    /// included, so their tokens share the default tenant's storage slot.
    pub fn resolve(&self, tenant: &TenantId) -> CredentialProfile {
        match self.profiles.get(tenant.as_str()) {
            Some(profile) => profile.clone(),
            None => {
                if tenant != &TenantId::default_tenant() {
                    tracing::debug!(tenant = %tenant, "tenant not configured, using default profile");
                }
                self.default_profile.clone()
            }
        }
    }

    /// Explicitly configured tenant names, default excluded
    pub fn known_tenants(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }

    fn build_profile(tenant: TenantId, cfg: &TenantProfileConfig) -> CredentialProfile {
        let scopes = cfg.scopes.clone().unwrap_or_else(CredentialProfile::default_scopes);
        CredentialProfile {
            tenant,
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            scopes,
            company_id: cfg.company_id,
        }
    }
}
