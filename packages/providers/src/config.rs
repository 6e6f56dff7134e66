// ABOUTME: Immutable per-provider OAuth configuration and the adapter registry
// ABOUTME: Built once at startup from environment-sourced credentials and injected

use std::collections::HashMap;

use reqwest::Client;

use crate::adapter::ProviderAdapter;
use crate::error::{ProviderError, ProviderResult};
use crate::github::GithubAdapter;
use crate::gitlab::GitlabAdapter;
use crate::kind::ProviderKind;

/// User-Agent sent on every upstream request. GitHub rejects requests
/// without one.
const USER_AGENT: &str = concat!("gitgauge/", env!("CARGO_PKG_VERSION"));

/// OAuth endpoints, API base, scopes, and credentials for one provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub auth_url: String,
    pub token_url: String,
    pub api_base: String,
    /// Space-delimited scope string, passed verbatim to the provider.
    pub scopes: String,
    pub client_id: String,
    pub client_secret: String,
    /// Full callback URL on this service, sent as `redirect_uri`.
    pub redirect_uri: String,
}

impl ProviderConfig {
    /// Provider defaults with the given credentials. `backend_url` is this
    /// service's public base URL, used to build the callback redirect URI.
    pub fn with_defaults(
        kind: ProviderKind,
        client_id: String,
        client_secret: String,
        backend_url: &str,
    ) -> Self {
        Self {
            kind,
            auth_url: kind.default_auth_url().to_string(),
            token_url: kind.default_token_url().to_string(),
            api_base: kind.default_api_base().to_string(),
            scopes: kind.default_scopes().to_string(),
            client_id,
            client_secret,
            redirect_uri: format!("{}{}", backend_url.trim_end_matches('/'), kind.redirect_path()),
        }
    }
}

/// Registry of configured provider adapters.
///
/// Providers without credentials at startup are simply absent; looking
/// one up fails the same way as an unknown provider key.
pub struct ProviderRegistry {
    adapters: HashMap<ProviderKind, Box<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new(configs: Vec<ProviderConfig>) -> ProviderResult<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        let mut adapters: HashMap<ProviderKind, Box<dyn ProviderAdapter>> = HashMap::new();
        for config in configs {
            let adapter: Box<dyn ProviderAdapter> = match config.kind {
                ProviderKind::Github => Box::new(GithubAdapter::new(config, client.clone())),
                ProviderKind::Gitlab => Box::new(GitlabAdapter::new(config, client.clone())),
            };
            adapters.insert(adapter.kind(), adapter);
        }

        Ok(Self { adapters })
    }

    pub fn get(&self, kind: ProviderKind) -> ProviderResult<&dyn ProviderAdapter> {
        self.adapters
            .get(&kind)
            .map(|a| a.as_ref())
            .ok_or_else(|| ProviderError::UnknownProvider(kind.to_string()))
    }

    /// Provider keys with a configured adapter.
    pub fn configured(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<_> = self.adapters.keys().copied().collect();
        kinds.sort_by_key(|k| k.to_string());
        kinds
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
