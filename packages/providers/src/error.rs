// ABOUTME: Error types for provider adapter operations
// ABOUTME: Covers provider lookup, token exchange, and upstream API failures

use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unknown provider: {0}. Supported: github, gitlab")]
    UnknownProvider(String),

    #[error("Token exchange failed: no access_token in provider response")]
    TokenExchangeFailed,

    #[error("Upstream {context} request failed with status {status}")]
    Upstream { status: u16, context: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    /// Build an `Upstream` error from a non-success response status.
    pub fn upstream(status: reqwest::StatusCode, context: &str) -> Self {
        Self::Upstream {
            status: status.as_u16(),
            context: context.to_string(),
        }
    }
}
