//! Token lifecycle management
//!
//! The manager owns every token decision: when a stored access token is
//! still good, when to refresh, and when to declare the tenant
//! unauthorized. Stores and the token endpoint stay behind ports.

pub mod manager;
pub mod ports;
pub mod profiles;

pub use manager::TokenManager;
pub use ports::{AccessTokenProvider, TokenEndpoint, TokenStore};
pub use profiles::CredentialResolver;
