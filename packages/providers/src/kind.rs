// ABOUTME: Provider key enum with endpoint and scope defaults per provider
// ABOUTME: Parsing rejects anything that is not a supported source-control host

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProviderError, ProviderResult};

/// Supported source-control providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Github,
    Gitlab,
}

impl ProviderKind {
    /// Default authorization URL for this provider
    pub fn default_auth_url(&self) -> &'static str {
        match self {
            Self::Github => "https://github.com/login/oauth/authorize",
            Self::Gitlab => "https://gitlab.com/oauth/authorize",
        }
    }

    /// Default token exchange URL for this provider
    pub fn default_token_url(&self) -> &'static str {
        match self {
            Self::Github => "https://github.com/login/oauth/access_token",
            Self::Gitlab => "https://gitlab.com/oauth/token",
        }
    }

    /// Default REST API base URL for this provider
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Self::Github => "https://api.github.com",
            Self::Gitlab => "https://gitlab.com/api/v4",
        }
    }

    /// Space-delimited OAuth scopes requested at login
    pub fn default_scopes(&self) -> &'static str {
        match self {
            Self::Github => "read:user repo",
            Self::Gitlab => "read_user read_api",
        }
    }

    /// Callback path on this service that the provider redirects back to
    pub fn redirect_path(&self) -> &'static str {
        match self {
            Self::Github => "/auth/github/callback",
            Self::Gitlab => "/auth/gitlab/callback",
        }
    }

    /// All supported providers
    pub fn all() -> Vec<Self> {
        vec![Self::Github, Self::Gitlab]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Github => write!(f, "github"),
            Self::Gitlab => write!(f, "gitlab"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> ProviderResult<Self> {
        match s.to_lowercase().as_str() {
            "github" => Ok(Self::Github),
            "gitlab" => Ok(Self::Gitlab),
            _ => Err(ProviderError::UnknownProvider(s.to_string())),
        }
    }
}
