//! Accounting ledger client for party and invoice operations

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use ledgerflow_core::auth::AccessTokenProvider;
use ledgerflow_core::ledger_ports::LedgerClient;
use ledgerflow_core::CredentialResolver;
use ledgerflow_domain::utils::vat::round2;
use ledgerflow_domain::{
    InvoiceDraft, LedgerFlowError, LedgerInvoice, PartyRecord, Result, TenantId,
};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::errors::InfraError;
use crate::http::HttpClient;

use super::codec;
use super::types::{ContractorBody, ContractorPayload, InvoiceBody, InvoicePayload, PaymentPayload};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// JSON API client for the accounting ledger
///
/// Every method is one remote request/response pair. Failures in the
/// post-invoice steps (payment, document, email) come back in their
/// step-specific error variants so the orchestrator can report them
/// without inspecting transport detail.
pub struct WfirmaClient {
    base_url: String,
    http_client: HttpClient,
    tokens: Arc<dyn AccessTokenProvider>,
    resolver: Arc<CredentialResolver>,
}

impl WfirmaClient {
    /// Create a new ledger client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the accounting API (e.g. "https://api2.wfirma.pl")
    /// * `tokens` - Provider that yields a valid bearer token per tenant
    /// * `resolver` - Credential resolver, consulted for the per-tenant
    ///   company selector
    pub fn new(
        base_url: String,
        tokens: Arc<dyn AccessTokenProvider>,
        resolver: Arc<CredentialResolver>,
    ) -> Result<Self> {
        let http_client =
            HttpClient::builder().timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            tokens,
            resolver,
        })
    }

    /// Full endpoint URL with the provider's fixed format markers and,
    /// when the tenant profile carries one, the company selector.
    fn endpoint(&self, tenant: &TenantId, module: &str, action: &str, id: Option<&str>) -> String {
        let mut url = format!("{}/{}/{}", self.base_url, module, action);
        if let Some(id) = id {
            url.push('/');
            url.push_str(id);
        }
        url.push_str("?inputFormat=json&outputFormat=json&oauth_version=2");
        if let Some(company_id) = self.resolver.resolve(tenant).company_id {
            url.push_str(&format!("&company_id={company_id}"));
        }
        url
    }

    /// Sends one authorized JSON request and returns the raw response.
    async fn post(
        &self,
        tenant: &TenantId,
        url: &str,
        body: &Value,
        accept: &str,
    ) -> Result<reqwest::Response> {
        let token = self.tokens.access_token(tenant).await?;
        let request = self
            .http_client
            .request(Method::POST, url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .header("Accept", accept)
            .json(body);
        self.http_client.send(request).await
    }

    /// Sends one request and parses the vendor envelope. The raw body
    /// text is returned alongside so callers can surface it verbatim.
    async fn post_json(
        &self,
        tenant: &TenantId,
        url: &str,
        body: &Value,
    ) -> Result<(Value, String)> {
        let response = self.post(tenant, url, body, "application/json").await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LedgerFlowError::from(InfraError::from(e)))?;

        if !status.is_success() {
            return Err(LedgerFlowError::Network(format!(
                "ledger API error (HTTP {status}): {text}"
            )));
        }

        let parsed: Value = serde_json::from_str(&text)
            .map_err(|e| LedgerFlowError::Internal(format!("ledger response unparseable: {e}")))?;
        Ok((parsed, text))
    }
}

#[async_trait]
impl LedgerClient for WfirmaClient {
    async fn find_party(&self, tenant: &TenantId, tax_id: &str) -> Result<Option<PartyRecord>> {
        let url = self.endpoint(tenant, "contractors", "find", None);
        let body = json!({"contractors": {"parameters": {"conditions": {"condition": {
            "field": "nip", "operator": "eq", "value": tax_id
        }}}}});

        let (parsed, _raw) = self.post_json(tenant, &url, &body).await?;

        // The vendor reports an empty result as a non-OK status
        if !codec::status_is_ok(&parsed) {
            debug!(
                tenant = %tenant, tax_id,
                status = %codec::status_message(&parsed),
                "ledger lookup returned no party"
            );
            return Ok(None);
        }

        let Some(first) = codec::entries(&parsed, "contractors", "contractor").into_iter().next()
        else {
            return Ok(None);
        };

        let contractor: ContractorBody = serde_json::from_value(first)
            .map_err(|e| LedgerFlowError::Internal(format!("contractor entry unparseable: {e}")))?;
        let party = contractor.into_party(tenant.clone(), tax_id);
        debug!(tenant = %tenant, tax_id, external_id = ?party.external_id, "ledger party found");
        Ok(Some(party))
    }

    async fn create_party(&self, tenant: &TenantId, party: &PartyRecord) -> Result<PartyRecord> {
        let url = self.endpoint(tenant, "contractors", "add", None);
        let body = json!({"contractors": {"contractor": ContractorPayload::from_party(party)}});

        let (parsed, raw) = self.post_json(tenant, &url, &body).await?;
        if !codec::status_is_ok(&parsed) {
            // Body verbatim; operators diagnose vendor validation from it
            return Err(LedgerFlowError::PartyCreateFailed(raw));
        }

        let external_id = codec::entries(&parsed, "contractors", "contractor")
            .into_iter()
            .next()
            .and_then(|entry| serde_json::from_value::<ContractorBody>(entry).ok())
            .and_then(|contractor| contractor.id)
            .map(|id| id.as_text())
            .ok_or_else(|| {
                LedgerFlowError::PartyCreateFailed(
                    "created contractor carries no id".to_string(),
                )
            })?;

        info!(
            tenant = %tenant, tax_id = %party.tax_id, external_id = %external_id,
            "party created in ledger"
        );

        // Keep the caller's record (source included); only the id is new
        let mut persisted = party.clone();
        persisted.external_id = Some(external_id);
        Ok(persisted)
    }

    async fn create_invoice(
        &self,
        tenant: &TenantId,
        draft: &InvoiceDraft,
    ) -> Result<LedgerInvoice> {
        let external_id = draft.party.external_id.as_deref().ok_or_else(|| {
            LedgerFlowError::Internal("invoice draft party has no external id".to_string())
        })?;
        let contractor_id = external_id.parse::<i64>().map_err(|_| {
            LedgerFlowError::Internal(format!("party external id '{external_id}' is not numeric"))
        })?;

        let url = self.endpoint(tenant, "invoices", "add", None);
        let body = json!({"invoices": {"invoice": InvoicePayload::from_draft(draft, contractor_id)}});

        let (parsed, raw) = self.post_json(tenant, &url, &body).await?;
        if !codec::status_is_ok(&parsed) {
            let message = codec::status_message(&parsed);
            if codec::mentions_accounting_scheme(&raw) {
                return Err(LedgerFlowError::AccountingSchemeMissing(message));
            }
            return Err(LedgerFlowError::InvoiceCreateFailed(message));
        }

        let invoice = codec::entries(&parsed, "invoices", "invoice")
            .into_iter()
            .next()
            .and_then(|entry| serde_json::from_value::<InvoiceBody>(entry).ok())
            .and_then(InvoiceBody::into_invoice)
            .ok_or_else(|| {
                LedgerFlowError::InvoiceCreateFailed(
                    "created invoice missing from response".to_string(),
                )
            })?;

        info!(
            tenant = %tenant, invoice_id = %invoice.id, number = %invoice.number,
            total = invoice.total, "invoice created in ledger"
        );
        Ok(invoice)
    }

    async fn mark_paid(&self, tenant: &TenantId, invoice_id: &str, amount: f64) -> Result<()> {
        let object_id = invoice_id.parse::<i64>().map_err(|_| {
            LedgerFlowError::PaymentFinalizeFailed(format!(
                "invoice id '{invoice_id}' is not numeric"
            ))
        })?;

        let payload = PaymentPayload {
            object_name: "invoice",
            object_id,
            value: round2(amount),
            date: Utc::now().date_naive().to_string(),
        };
        let url = self.endpoint(tenant, "payments", "add", None);
        let body = json!({"payments": {"payment": payload}});

        let (parsed, _raw) = self
            .post_json(tenant, &url, &body)
            .await
            .map_err(|e| LedgerFlowError::PaymentFinalizeFailed(e.to_string()))?;

        if !codec::status_is_ok(&parsed) {
            return Err(LedgerFlowError::PaymentFinalizeFailed(codec::status_message(&parsed)));
        }

        info!(tenant = %tenant, invoice_id, amount = round2(amount), "payment recorded");
        Ok(())
    }

    async fn fetch_document(&self, tenant: &TenantId, invoice_id: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(tenant, "invoices", "download", Some(invoice_id));
        let body = json!({"invoices": {"parameters": {"parameter": [
            {"name": "page", "value": "invoice"},
            {"name": "address", "value": "0"},
            {"name": "leaflet", "value": "0"},
            {"name": "duplicate", "value": "0"}
        ]}}});

        let response = self
            .post(tenant, &url, &body, "application/pdf")
            .await
            .map_err(|e| LedgerFlowError::DocumentFetchFailed(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        // Errors come back as JSON with a 200 status; the content type is
        // the only reliable success signal
        if !status.is_success() || !content_type.contains("pdf") {
            return Err(LedgerFlowError::DocumentFetchFailed(format!(
                "HTTP {status}, content type '{content_type}'"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LedgerFlowError::DocumentFetchFailed(e.to_string()))?;
        debug!(tenant = %tenant, invoice_id, size = bytes.len(), "invoice document fetched");
        Ok(bytes.to_vec())
    }

    async fn send_email(
        &self,
        tenant: &TenantId,
        invoice_id: &str,
        recipient: &str,
        subject: Option<&str>,
        body: Option<&str>,
    ) -> Result<()> {
        let url = self.endpoint(tenant, "invoices", "send", Some(invoice_id));

        let mut parameters = vec![param("email", recipient)];
        if let Some(subject) = subject {
            parameters.push(param("subject", subject));
        }
        parameters.push(param("page", "invoice"));
        parameters.push(param("leaflet", "0"));
        parameters.push(param("duplicate", "0"));
        if let Some(body) = body {
            parameters.push(param("body", body));
        }
        let payload = json!({"invoices": {"parameters": parameters}});

        let (parsed, _raw) = self
            .post_json(tenant, &url, &payload)
            .await
            .map_err(|e| LedgerFlowError::EmailDispatchFailed(e.to_string()))?;

        if !codec::status_is_ok(&parsed) {
            return Err(LedgerFlowError::EmailDispatchFailed(codec::status_message(&parsed)));
        }

        info!(tenant = %tenant, invoice_id, recipient, "invoice emailed");
        Ok(())
    }
}

fn param(name: &str, value: &str) -> Value {
    json!({"parameter": {"name": name, "value": value}})
}
