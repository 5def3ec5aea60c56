//! Configuration loader
//!
//! Loads application configuration from a file and the environment.
//!
//! ## Loading Strategy
//! 1. Reads the file named by `LEDGERFLOW_CONFIG`, or probes standard paths
//! 2. Starts from built-in defaults when no file exists
//! 3. Applies environment variable overrides on top
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `LEDGERFLOW_CONFIG`: Explicit config file path
//! - `LEDGERFLOW_BIND_ADDR`: Socket address the API server binds to
//! - `LEDGERFLOW_API_KEY`: Shared secret for the `X-Api-Key` guard
//! - `LEDGERFLOW_AUTHORIZE_URL`: OAuth2 authorization page
//! - `LEDGERFLOW_TOKEN_URL`: OAuth2 token endpoint
//! - `LEDGERFLOW_REDIRECT_URI`: OAuth2 redirect URI
//! - `LEDGERFLOW_LEDGER_URL`: Accounting API base URL
//! - `LEDGERFLOW_REGISTRY_URL`: Business registry SOAP endpoint
//! - `LEDGERFLOW_REGISTRY_KEY`: Business registry operator key
//! - `LEDGERFLOW_STORE_PATH`: Token store directory
//! - `LEDGERFLOW_CLIENT_ID`: Default tenant OAuth2 client id
//! - `LEDGERFLOW_CLIENT_SECRET`: Default tenant OAuth2 client secret
//! - `LEDGERFLOW_COMPANY_ID`: Default tenant company selector (numeric)
//! - `LEDGERFLOW_SCOPES`: Default tenant scopes (whitespace separated)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./ledgerflow.toml` or `./ledgerflow.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. `../ledgerflow.toml` or `../ledgerflow.json` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use ledgerflow_domain::{Config, LedgerFlowError, Result};

/// Load configuration with automatic fallback strategy
///
/// Reads the config file named by `LEDGERFLOW_CONFIG` (which must exist),
/// otherwise the first file found by [`probe_config_paths`], otherwise
/// built-in defaults. Environment variables override file values either way.
///
/// # Errors
/// Returns `LedgerFlowError::Config` if:
/// - An explicitly named config file is missing or invalid
/// - A numeric override has a non-numeric value
pub fn load() -> Result<Config> {
    let explicit = env_opt("LEDGERFLOW_CONFIG").map(PathBuf::from);

    let config = match explicit {
        Some(path) => load_from_file(Some(path))?,
        None => match probe_config_paths() {
            Some(path) => load_from_file(Some(path))?,
            None => {
                tracing::debug!("no config file found, using built-in defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `LedgerFlowError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LedgerFlowError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LedgerFlowError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LedgerFlowError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LedgerFlowError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LedgerFlowError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(LedgerFlowError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./ledgerflow.{toml,json}`,
///    `./config.{toml,json}`)
/// 2. Parent directory (`../ledgerflow.{toml,json}`)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("ledgerflow.toml"),
            cwd.join("ledgerflow.json"),
            cwd.join("config.toml"),
            cwd.join("config.json"),
            cwd.join("../ledgerflow.toml"),
            cwd.join("../ledgerflow.json"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates
                .extend(vec![exe_dir.join("ledgerflow.toml"), exe_dir.join("ledgerflow.json")]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Apply `LEDGERFLOW_*` environment overrides to a loaded configuration
///
/// Unset and empty variables leave the file value in place. Credential
/// overrides land on the default tenant profile; per-tenant profiles are
/// file-only.
fn apply_env_overrides(mut config: Config) -> Result<Config> {
    if let Some(addr) = env_opt("LEDGERFLOW_BIND_ADDR") {
        config.server.bind_addr = addr;
    }
    if let Some(key) = env_opt("LEDGERFLOW_API_KEY") {
        config.server.api_key = Some(key);
    }
    if let Some(url) = env_opt("LEDGERFLOW_AUTHORIZE_URL") {
        config.oauth.authorize_url = url;
    }
    if let Some(url) = env_opt("LEDGERFLOW_TOKEN_URL") {
        config.oauth.token_url = url;
    }
    if let Some(uri) = env_opt("LEDGERFLOW_REDIRECT_URI") {
        config.oauth.redirect_uri = uri;
    }
    if let Some(url) = env_opt("LEDGERFLOW_LEDGER_URL") {
        config.ledger.base_url = url;
    }
    if let Some(url) = env_opt("LEDGERFLOW_REGISTRY_URL") {
        config.registry.base_url = url;
    }
    if let Some(key) = env_opt("LEDGERFLOW_REGISTRY_KEY") {
        config.registry.user_key = key;
    }
    if let Some(path) = env_opt("LEDGERFLOW_STORE_PATH") {
        config.store.path = path;
    }
    if let Some(id) = env_opt("LEDGERFLOW_CLIENT_ID") {
        config.tenants.default.client_id = id;
    }
    if let Some(secret) = env_opt("LEDGERFLOW_CLIENT_SECRET") {
        config.tenants.default.client_secret = secret;
    }
    if let Some(raw) = env_opt("LEDGERFLOW_COMPANY_ID") {
        let id = raw
            .parse::<i64>()
            .map_err(|e| LedgerFlowError::Config(format!("Invalid company id: {}", e)))?;
        config.tenants.default.company_id = Some(id);
    }
    if let Some(raw) = env_opt("LEDGERFLOW_SCOPES") {
        config.tenants.default.scopes = Some(raw.split_whitespace().map(str::to_string).collect());
    }

    Ok(config)
}

/// Get an environment variable, treating empty values as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}
