//! In-memory token store for tests and short-lived tooling

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use ledgerflow_core::auth::TokenStore;
use ledgerflow_domain::{RefreshLease, Result, TenantId, TokenRecord};

/// Token store that keeps all state in process memory
#[derive(Default)]
pub struct InMemoryTokenStore {
    records: Mutex<HashMap<String, TokenRecord>>,
    leases: Mutex<HashMap<String, RefreshLease>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned map still holds consistent data; writes are single inserts
    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<String, TokenRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn leases(&self) -> std::sync::MutexGuard<'_, HashMap<String, RefreshLease>> {
        self.leases.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load_record(&self, tenant: &TenantId) -> Result<Option<TokenRecord>> {
        Ok(self.records().get(tenant.as_str()).cloned())
    }

    async fn save_record(&self, tenant: &TenantId, record: &TokenRecord) -> Result<()> {
        self.records().insert(tenant.as_str().to_string(), record.clone());
        Ok(())
    }

    async fn load_lease(&self, tenant: &TenantId) -> Result<Option<RefreshLease>> {
        Ok(self.leases().get(tenant.as_str()).cloned())
    }

    async fn save_lease(&self, tenant: &TenantId, lease: &RefreshLease) -> Result<()> {
        self.leases().insert(tenant.as_str().to_string(), lease.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ledgerflow_domain::TokenGrant;

    use super::*;

    #[tokio::test]
    async fn record_round_trips_per_tenant() {
        let store = InMemoryTokenStore::new();
        let tenant = TenantId::new("acme");
        let record = TokenRecord::from_grant(
            TokenGrant {
                access_token: "at-1".to_string(),
                refresh_token: Some("rt-1".to_string()),
                expires_in: Some(3600),
                token_type: None,
                scope: None,
            },
            None,
            Utc::now(),
        );

        store.save_record(&tenant, &record).await.unwrap();

        assert_eq!(store.load_record(&tenant).await.unwrap(), Some(record));
        assert!(store.load_record(&TenantId::new("other")).await.unwrap().is_none());
    }
}
