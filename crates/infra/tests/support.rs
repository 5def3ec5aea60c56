use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use ledgerflow_core::auth::AccessTokenProvider;
use ledgerflow_core::CredentialResolver;
use ledgerflow_domain::{
    InvoiceDraft, InvoiceLineItem, PartyRecord, PartySource, Result, TenantId, TenantProfileConfig,
    TenantsConfig,
};

/// Token provider that hands out one fixed token and counts how often it
/// was asked.
pub struct StaticTokenProvider {
    token: String,
    calls: AtomicUsize,
}

impl StaticTokenProvider {
    pub fn new(token: &str) -> Self {
        Self { token: token.to_string(), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self, _tenant: &TenantId) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.token.clone())
    }
}

/// Resolver with a bare default profile and one "acme" tenant that
/// carries a company selector.
pub fn test_resolver() -> Arc<CredentialResolver> {
    let mut config = TenantsConfig::default();
    config.default.client_id = "client-default".to_string();
    config.default.client_secret = "secret-default".to_string();
    config.profiles.insert(
        "acme".to_string(),
        TenantProfileConfig {
            client_id: "client-acme".to_string(),
            client_secret: "secret-acme".to_string(),
            scopes: None,
            company_id: Some(77),
        },
    );
    Arc::new(CredentialResolver::from_config(&config))
}

/// Party record as the ledger would return it, id already assigned.
pub fn persisted_party(tenant: &TenantId, external_id: &str) -> PartyRecord {
    PartyRecord {
        tenant: tenant.clone(),
        external_id: Some(external_id.to_string()),
        tax_id: "5260305006".to_string(),
        name: "Testowa Firma Sp. z o.o.".to_string(),
        street: "ul. Prosta 51".to_string(),
        zip_code: "00-838".to_string(),
        city: "Warszawa".to_string(),
        country: "PL".to_string(),
        email: Some("biuro@testowa.pl".to_string()),
        source: PartySource::Ledger,
    }
}

/// Party synthesized from a registry hit, not yet persisted.
pub fn registry_party(tenant: &TenantId) -> PartyRecord {
    PartyRecord {
        tenant: tenant.clone(),
        external_id: None,
        tax_id: "5260305006".to_string(),
        name: "Nowa Firma Sp. z o.o.".to_string(),
        street: "ul. Krzywa 7/2".to_string(),
        zip_code: "00-001".to_string(),
        city: "Warszawa".to_string(),
        country: "PL".to_string(),
        email: None,
        source: PartySource::Registry,
    }
}

/// One-line unpaid draft for the given party.
pub fn simple_draft(party: PartyRecord) -> InvoiceDraft {
    InvoiceDraft {
        party,
        lines: vec![InvoiceLineItem {
            name: "Usluga programistyczna".to_string(),
            quantity: 2.0,
            unit: "szt.".to_string(),
            unit_price_net: 100.0,
            vat_code: "23".to_string(),
        }],
        issue_date: NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date"),
        sale_date: NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date"),
        due_date: NaiveDate::from_ymd_opt(2025, 3, 24).expect("valid date"),
        series_selector: None,
        paid: false,
        document_type: InvoiceDraft::default_document_type(),
    }
}
