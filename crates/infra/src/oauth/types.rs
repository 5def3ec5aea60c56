//! Wire types for the token endpoint

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ledgerflow_domain::TokenGrant;
use serde::Deserialize;

/// Successful grant response as the provider serializes it
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl From<TokenResponse> for TokenGrant {
    fn from(value: TokenResponse) -> Self {
        TokenGrant {
            access_token: value.access_token,
            refresh_token: value.refresh_token,
            expires_in: value.expires_in,
            token_type: value.token_type,
            scope: value.scope,
        }
    }
}

/// Error body the token endpoint returns on rejected grants
#[derive(Debug, Deserialize)]
pub struct OAuthErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl OAuthErrorBody {
    pub fn describe(&self) -> String {
        match &self.error_description {
            Some(description) => format!("{}: {}", self.error, description),
            None => self.error.clone(),
        }
    }
}

/// Random URL-safe `state` value for one authorization round trip
pub fn random_state() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}
