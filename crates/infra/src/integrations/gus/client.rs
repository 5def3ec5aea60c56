//! Registry lookup client over the BIR 1.1 SOAP service

use std::time::Duration;

use async_trait::async_trait;
use ledgerflow_core::registry_ports::RegistryLookup;
use ledgerflow_domain::{clean_tax_id, LedgerFlowError, RegistryConfig, RegistryEntity, Result};
use reqwest::Method;
use tracing::{debug, warn};

use crate::http::HttpClient;

use super::envelope;
use super::parser;

const REGISTRY_TIMEOUT_SECS: u64 = 10;

/// SOAP client implementing the registry lookup port.
///
/// Sessions are not reused: every lookup logs in, searches with the
/// fresh session id, and lets the session expire server-side. The
/// registry tolerates this and it keeps the client free of session
/// state and renewal races.
pub struct GusClient {
    service_url: String,
    user_key: String,
    http_client: HttpClient,
}

impl GusClient {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let http_client =
            HttpClient::builder().timeout(Duration::from_secs(REGISTRY_TIMEOUT_SECS)).build()?;

        Ok(Self {
            service_url: config.base_url.trim_end_matches('/').to_string(),
            user_key: config.user_key.clone(),
            http_client,
        })
    }

    async fn post_soap(&self, envelope: String, session_id: Option<&str>) -> Result<String> {
        let mut request = self
            .http_client
            .request(Method::POST, &self.service_url)
            .header("Content-Type", "application/soap+xml; charset=utf-8")
            .header("Accept", "application/soap+xml")
            .body(envelope);
        if let Some(sid) = session_id {
            request = request.header("sid", sid);
        }

        let response = self.http_client.send(request).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LedgerFlowError::Network(format!("registry response unreadable: {e}")))?;
        debug!(%status, bytes = text.len(), "registry SOAP exchange");
        Ok(text)
    }

    /// Opens a session and returns its id.
    async fn login(&self) -> Result<String> {
        if self.user_key.trim().is_empty() {
            return Err(LedgerFlowError::RegistryLogin(
                "registry user key is not configured".to_string(),
            ));
        }

        let body = envelope::login_envelope(&self.service_url, &self.user_key);
        let response = self.post_soap(body, None).await?;
        let soap_part = parser::extract_soap_part(&response);

        let session_id = parser::extract_tag_text(soap_part, "ZalogujResult")
            .map(str::trim)
            .unwrap_or_default();
        if session_id.is_empty() {
            return Err(LedgerFlowError::RegistryLogin(format!(
                "registry login returned no session id: {}",
                snippet(soap_part)
            )));
        }
        Ok(session_id.to_string())
    }
}

#[async_trait]
impl RegistryLookup for GusClient {
    async fn lookup(&self, tax_id: &str) -> Result<Vec<RegistryEntity>> {
        let tax_id = clean_tax_id(tax_id);
        let session_id = self.login().await?;

        let body = envelope::search_envelope(&self.service_url, &tax_id);
        let response = self.post_soap(body, Some(&session_id)).await?;
        let soap_part = parser::extract_soap_part(&response);

        let Some(inner) = parser::extract_tag_text(soap_part, "DaneSzukajPodmiotyResult") else {
            // The service answers "nothing found" with a self-closing
            // result element
            warn!(tax_id = %tax_id, snippet = %snippet(soap_part), "registry search carried no result element");
            return Ok(Vec::new());
        };
        if inner.trim().is_empty() {
            return Ok(Vec::new());
        }

        let decoded = parser::decode_inner_xml(inner);
        if decoded.is_empty() {
            return Err(LedgerFlowError::RegistryParse(
                "registry payload decoded to empty content".to_string(),
            ));
        }

        let entities = parser::parse_entities(&decoded)?;
        debug!(tax_id = %tax_id, hits = entities.len(), "registry search finished");
        Ok(entities)
    }
}

fn snippet(text: &str) -> String {
    if text.chars().count() > 300 {
        let cut: String = text.chars().take(300).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
