// ABOUTME: Environment-sourced server configuration
// ABOUTME: Provider credentials are optional; a provider without both halves is skipped

use std::env;
use std::num::ParseIntError;

use thiserror::Error;

use gitgauge_providers::{ProviderConfig, ProviderKind};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid session TTL: {0}")]
    InvalidSessionTtl(String),
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    /// Where the OAuth callback sends the browser after login.
    pub frontend_url: String,
    /// Public base URL of this service, used in redirect URIs.
    pub backend_url: String,
    pub session_ttl_secs: i64,
    pub providers: Vec<ProviderConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "4000".to_string());
        let port = port_str.parse::<u16>()?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let frontend_url = env::var("FRONTEND_URL").unwrap_or_else(|_| cors_origin.clone());

        let backend_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let ttl_str = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| gitgauge_auth::DEFAULT_TTL_SECS.to_string());
        let session_ttl_secs = ttl_str
            .parse::<i64>()
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or(ConfigError::InvalidSessionTtl(ttl_str))?;

        let mut providers = Vec::new();
        for kind in ProviderKind::all() {
            if let Some(config) = provider_from_env(kind, &backend_url) {
                providers.push(config);
            }
        }

        Ok(Config {
            port,
            cors_origin,
            frontend_url,
            backend_url,
            session_ttl_secs,
            providers,
        })
    }
}

/// Provider credentials from `GITHUB_CLIENT_ID`/`GITHUB_CLIENT_SECRET`
/// (resp. `GITLAB_*`). Both halves must be present and non-empty.
fn provider_from_env(kind: ProviderKind, backend_url: &str) -> Option<ProviderConfig> {
    let prefix = kind.to_string().to_uppercase();
    let client_id = env::var(format!("{prefix}_CLIENT_ID")).ok().filter(|v| !v.is_empty())?;
    let client_secret = env::var(format!("{prefix}_CLIENT_SECRET"))
        .ok()
        .filter(|v| !v.is_empty())?;

    Some(ProviderConfig::with_defaults(
        kind,
        client_id,
        client_secret,
        backend_url,
    ))
}
