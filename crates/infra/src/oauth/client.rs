//! Token endpoint client
//!
//! Implements the authorization-code exchange and the refresh grant
//! against the accounting provider's OAuth2 endpoint. The provider
//! deviates from RFC 6749 in one place: the refresh grant carries the
//! refresh token in the `code` form field, not `refresh_token`.

use std::time::Duration;

use async_trait::async_trait;
use ledgerflow_core::auth::TokenEndpoint;
use ledgerflow_domain::{CredentialProfile, LedgerFlowError, OAuthConfig, Result, TokenGrant};
use reqwest::Method;
use tracing::debug;

use crate::errors::InfraError;
use crate::http::HttpClient;

use super::types::{OAuthErrorBody, TokenResponse};

/// Client for the provider's OAuth2 endpoints
pub struct OAuthClient {
    authorize_url: String,
    token_url: String,
    redirect_uri: String,
    http: HttpClient,
}

impl OAuthClient {
    pub fn new(config: &OAuthConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            authorize_url: config.authorize_url.clone(),
            token_url: config.token_url.clone(),
            redirect_uri: config.redirect_uri.clone(),
            http,
        })
    }

    /// Browser URL that starts the authorization flow for a profile.
    ///
    /// `state` ties the eventual callback back to the tenant that asked
    /// for it; the caller keeps the mapping.
    pub fn authorize_url(&self, profile: &CredentialProfile, state: &str) -> Result<String> {
        let mut url = url::Url::parse(&self.authorize_url)
            .map_err(|e| LedgerFlowError::Config(format!("invalid authorize URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &profile.client_id)
            .append_pair("scope", &profile.scope_string())
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", state);
        Ok(url.to_string())
    }

    /// Posts one grant request and normalizes the response.
    async fn grant(&self, form: &[(&str, &str)]) -> Result<TokenGrant> {
        let request = self.http.request(Method::POST, &self.token_url).form(form);
        let response = self.http.send(request).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LedgerFlowError::from(InfraError::from(e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<OAuthErrorBody>(&body)
                .map(|e| e.describe())
                .unwrap_or_else(|_| snippet(&body));
            return Err(LedgerFlowError::AuthUnavailable(format!(
                "token endpoint returned {status}: {detail}"
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            LedgerFlowError::AuthUnavailable(format!("token endpoint response unparseable: {e}"))
        })?;
        Ok(parsed.into())
    }
}

#[async_trait]
impl TokenEndpoint for OAuthClient {
    async fn exchange_code(&self, profile: &CredentialProfile, code: &str) -> Result<TokenGrant> {
        debug!(tenant = %profile.tenant, "exchanging authorization code");
        self.grant(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &profile.client_id),
            ("client_secret", &profile.client_secret),
            ("redirect_uri", &self.redirect_uri),
        ])
        .await
    }

    async fn refresh(&self, profile: &CredentialProfile, refresh_token: &str) -> Result<TokenGrant> {
        debug!(tenant = %profile.tenant, "refreshing access token");
        // Provider quirk: the refresh token rides in `code`.
        self.grant(&[
            ("grant_type", "refresh_token"),
            ("code", refresh_token),
            ("client_id", &profile.client_id),
            ("client_secret", &profile.client_secret),
        ])
        .await
    }
}

/// Error pages can be whole HTML documents; keep logs and error strings short.
fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > 200 {
        let cut: String = trimmed.chars().take(200).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}
