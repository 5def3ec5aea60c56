//! Application context - dependency injection container

use std::collections::HashMap;
use std::sync::Arc;

use ledgerflow_core::{
    AccessTokenProvider, CredentialResolver, InvoiceWorkflowService, LedgerClient, RegistryLookup,
    TokenEndpoint, TokenManager, TokenStore,
};
use ledgerflow_domain::{Config, Result, TenantId};
use ledgerflow_infra::config::loader;
use ledgerflow_infra::oauth::random_state;
use ledgerflow_infra::{FileTokenStore, GusClient, OAuthClient, WfirmaClient};
use parking_lot::Mutex;

/// Application context - holds all services and dependencies
///
/// Built once at startup and shared behind an `Arc` by every request
/// handler. The pending map ties authorization `state` nonces back to the
/// tenant that started the round trip.
pub struct AppContext {
    pub config: Config,
    pub resolver: Arc<CredentialResolver>,
    pub tokens: Arc<TokenManager>,
    pub oauth: Arc<OAuthClient>,
    pub workflow: Arc<InvoiceWorkflowService>,
    pending: Mutex<HashMap<String, TenantId>>,
}

impl AppContext {
    /// Creates the context from configuration discovered in the environment
    pub fn new() -> Result<Self> {
        Self::from_config(loader::load()?)
    }

    /// Creates the context from explicit configuration.
    ///
    /// Tests use this to point every collaborator at mock endpoints.
    pub fn from_config(config: Config) -> Result<Self> {
        let resolver = Arc::new(CredentialResolver::from_config(&config.tenants));
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.store.path.as_str()));
        let oauth = Arc::new(OAuthClient::new(&config.oauth)?);
        let tokens = Arc::new(TokenManager::new(
            resolver.clone(),
            store,
            oauth.clone() as Arc<dyn TokenEndpoint>,
        ));

        let ledger: Arc<dyn LedgerClient> = Arc::new(WfirmaClient::new(
            config.ledger.base_url.clone(),
            tokens.clone() as Arc<dyn AccessTokenProvider>,
            resolver.clone(),
        )?);
        let registry: Arc<dyn RegistryLookup> = Arc::new(GusClient::new(&config.registry)?);
        let workflow = Arc::new(InvoiceWorkflowService::new(
            tokens.clone() as Arc<dyn AccessTokenProvider>,
            registry,
            ledger,
        ));

        Ok(Self { config, resolver, tokens, oauth, workflow, pending: Mutex::new(HashMap::new()) })
    }

    /// Registers an authorization round trip and returns its state nonce
    pub fn begin_authorization(&self, tenant: TenantId) -> String {
        let state = random_state();
        self.pending.lock().insert(state.clone(), tenant);
        state
    }

    /// Claims the tenant behind a callback state. A state is good once;
    /// replayed callbacks come back empty.
    pub fn take_authorization(&self, state: &str) -> Option<TenantId> {
        self.pending.lock().remove(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::default();
        config.store.path = dir.path().display().to_string();
        config.tenants.default.client_id = "client-1".to_string();
        config.tenants.default.client_secret = "secret-1".to_string();
        config
    }

    #[test]
    fn context_wires_from_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = AppContext::from_config(test_config(&dir)).expect("context builds");

        assert!(ctx.config.server.api_key.is_none());
        assert!(ctx.resolver.known_tenants().is_empty());
    }

    #[test]
    fn authorization_states_are_single_use() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = AppContext::from_config(test_config(&dir)).expect("context builds");

        let state = ctx.begin_authorization(TenantId::new("acme"));
        assert_eq!(ctx.take_authorization(&state), Some(TenantId::new("acme")));
        assert_eq!(ctx.take_authorization(&state), None);
    }

    #[test]
    fn concurrent_round_trips_get_distinct_states() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = AppContext::from_config(test_config(&dir)).expect("context builds");

        let first = ctx.begin_authorization(TenantId::new("alpha"));
        let second = ctx.begin_authorization(TenantId::new("beta"));

        assert_ne!(first, second);
        assert_eq!(ctx.take_authorization(&second), Some(TenantId::new("beta")));
        assert_eq!(ctx.take_authorization(&first), Some(TenantId::new("alpha")));
    }
}
