//! OAuth2 client for the accounting provider's token endpoint

pub mod client;
pub mod types;

pub use client::OAuthClient;
pub use types::random_state;
