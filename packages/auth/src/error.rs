// ABOUTME: Error types for session handling and the OAuth exchange flow
// ABOUTME: Distinguishes caller-input errors from authentication gaps and upstream failures

use thiserror::Error;

use gitgauge_providers::ProviderError;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No authorization code provided")]
    MissingCode,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Session store error: {0}")]
    Session(#[from] SessionError),
}

/// Store-level failure; the in-memory store only fails on a poisoned lock.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session store lock poisoned")]
    Poisoned,
}
