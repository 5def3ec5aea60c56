//! Filesystem-backed token store
//!
//! One JSON file per tenant for the token record, one for the refresh
//! lease. Files are replaced atomically (write to a temp file, then
//! rename), so readers never observe a half-written record. An
//! unreadable file is treated as absent rather than fatal; the next
//! successful save repairs it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ledgerflow_core::auth::TokenStore;
use ledgerflow_domain::{RefreshLease, Result, TenantId, TokenRecord};
use tokio::sync::Mutex;
use tracing::warn;

use crate::errors::InfraError;

/// Token store that persists per-tenant state under a root directory
pub struct FileTokenStore {
    root: PathBuf,
    // Serializes the temp-write/rename pair within this process
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Creates a store rooted at `root`. The directory is created on the
    /// first save, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), write_lock: Mutex::new(()) }
    }

    fn record_path(&self, tenant: &TenantId) -> PathBuf {
        self.root.join(format!("{}.json", slug(tenant)))
    }

    fn lease_path(&self, tenant: &TenantId) -> PathBuf {
        self.root.join(format!("{}.lease.json", slug(tenant)))
    }

    async fn load_json<T>(&self, path: &Path) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(e)),
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable store file, treating as absent");
                Ok(None)
            }
        }
    }

    async fn save_json<T>(&self, path: &Path, value: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| ledgerflow_domain::LedgerFlowError::from(InfraError::from(e)))?;

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.root).await.map_err(io_err)?;

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, json.as_bytes()).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load_record(&self, tenant: &TenantId) -> Result<Option<TokenRecord>> {
        self.load_json(&self.record_path(tenant)).await
    }

    async fn save_record(&self, tenant: &TenantId, record: &TokenRecord) -> Result<()> {
        self.save_json(&self.record_path(tenant), record).await
    }

    async fn load_lease(&self, tenant: &TenantId) -> Result<Option<RefreshLease>> {
        self.load_json(&self.lease_path(tenant)).await
    }

    async fn save_lease(&self, tenant: &TenantId, lease: &RefreshLease) -> Result<()> {
        self.save_json(&self.lease_path(tenant), lease).await
    }
}

/// Tenant names come from config keys; anything else lands on a safe slug.
fn slug(tenant: &TenantId) -> String {
    tenant
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn io_err(e: std::io::Error) -> ledgerflow_domain::LedgerFlowError {
    InfraError::from(e).into()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ledgerflow_domain::{TokenGrant, TokenRecord};
    use tempfile::tempdir;

    use super::*;

    fn record(access: &str) -> TokenRecord {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        TokenRecord::from_grant(
            TokenGrant {
                access_token: access.to_string(),
                refresh_token: Some("rt-1".to_string()),
                expires_in: Some(3600),
                token_type: None,
                scope: None,
            },
            None,
            now,
        )
    }

    #[tokio::test]
    async fn missing_file_reads_as_absent() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        let loaded = store.load_record(&TenantId::new("acme")).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn record_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        let tenant = TenantId::new("acme");
        let record = record("at-1");

        store.save_record(&tenant, &record).await.unwrap();
        let loaded = store.load_record(&tenant).await.unwrap().expect("record present");

        assert_eq!(loaded, record);
        assert!(dir.path().join("acme.json").exists());
    }

    /// Validates `FileTokenStore::load_record` behavior for the corrupt
    /// file scenario.
    ///
    /// Assertions:
    /// - Ensures garbage on disk reads as "no record" instead of an error
    /// - Confirms the next save repairs the slot
    #[tokio::test]
    async fn corrupt_file_reads_as_absent_and_heals() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        let tenant = TenantId::new("acme");

        std::fs::write(dir.path().join("acme.json"), b"{ not json").unwrap();
        assert!(store.load_record(&tenant).await.unwrap().is_none());

        store.save_record(&tenant, &record("at-2")).await.unwrap();
        let healed = store.load_record(&tenant).await.unwrap().expect("record present");
        assert_eq!(healed.access_token, "at-2");
    }

    #[tokio::test]
    async fn tenants_have_separate_slots() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.save_record(&TenantId::new("acme"), &record("at-acme")).await.unwrap();
        store.save_record(&TenantId::new("globex"), &record("at-globex")).await.unwrap();

        let acme = store.load_record(&TenantId::new("acme")).await.unwrap().unwrap();
        let globex = store.load_record(&TenantId::new("globex")).await.unwrap().unwrap();
        assert_eq!(acme.access_token, "at-acme");
        assert_eq!(globex.access_token, "at-globex");
    }

    #[tokio::test]
    async fn lease_slot_is_separate_from_record() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        let tenant = TenantId::new("acme");
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();

        store.save_record(&tenant, &record("at-1")).await.unwrap();
        store.save_lease(&tenant, &RefreshLease::new("worker-1", now)).await.unwrap();

        assert!(store.load_record(&tenant).await.unwrap().is_some());
        let lease = store.load_lease(&tenant).await.unwrap().expect("lease present");
        assert_eq!(lease.holder, "worker-1");
        assert!(dir.path().join("acme.lease.json").exists());
    }

    #[tokio::test]
    async fn hostile_tenant_name_stays_inside_store_dir() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        let tenant = TenantId::new("../evil");

        store.save_record(&tenant, &record("at-1")).await.unwrap();

        assert!(dir.path().join("___evil.json").exists());
        assert!(store.load_record(&tenant).await.unwrap().is_some());
    }
}
