// ABOUTME: OAuth exchange flow orchestrating login, callback, and logout
// ABOUTME: Unauthenticated -> AwaitingCallback -> Authenticated, with session-bound credentials

use std::sync::Arc;

use tracing::{info, warn};

use gitgauge_providers::{NormalizedUser, ProviderKind, ProviderRegistry};

use crate::error::{AuthError, AuthResult};
use crate::session::{ProviderCredentials, SessionId, SessionStore};

/// Orchestrates the authorization-code exchange and session updates.
pub struct OAuthFlow {
    registry: Arc<ProviderRegistry>,
    sessions: SessionStore,
}

impl OAuthFlow {
    pub fn new(registry: Arc<ProviderRegistry>, sessions: SessionStore) -> Self {
        Self { registry, sessions }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Authorization URL for the given provider key. No session mutation.
    pub fn initiate_login(&self, provider: &str) -> AuthResult<String> {
        let kind: ProviderKind = provider.parse()?;
        let adapter = self.registry.get(kind)?;
        let url = adapter.build_auth_url()?;
        info!("Redirecting to {} authorization endpoint", kind);
        Ok(url)
    }

    /// Exchange the callback's authorization code, fetch the identity, and
    /// bind both to the session.
    ///
    /// Codes are single-use, so nothing here retries; any upstream failure
    /// surfaces immediately and leaves the session unauthenticated.
    pub async fn handle_callback(
        &self,
        session_id: Option<&SessionId>,
        provider: &str,
        code: Option<&str>,
    ) -> AuthResult<(SessionId, NormalizedUser)> {
        let kind: ProviderKind = provider.parse()?;
        let adapter = self.registry.get(kind)?;
        let code = code.filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)?;

        let access_token = adapter.exchange_code(code).await?;
        let user = adapter.fetch_user(&access_token).await?;

        let session_id = self
            .sessions
            .login(session_id, kind, user.clone(), access_token)?;

        info!("Authenticated {} via {}", user.username, kind);
        Ok((session_id, user))
    }

    /// Clear the active provider's credentials. Idempotent; attempts
    /// provider-side revocation first, but a revocation failure never
    /// blocks the local logout.
    pub async fn logout(&self, session_id: Option<&SessionId>) -> AuthResult<ProviderKind> {
        let session_id = session_id.ok_or(AuthError::NotAuthenticated)?;
        let record = self
            .sessions
            .get(session_id)?
            .ok_or(AuthError::NotAuthenticated)?;
        let kind = record.active_provider.ok_or(AuthError::NotAuthenticated)?;

        if let Some(creds) = record.credentials.get(&kind) {
            let adapter = self.registry.get(kind)?;
            if let Err(e) = adapter.revoke_token(&creds.access_token).await {
                warn!("Token revocation at {} failed: {}", kind, e);
            }
        }

        self.sessions.logout(session_id)?;
        info!("Logged out from {}", kind);
        Ok(kind)
    }

    /// Whether the session currently holds usable credentials.
    pub fn auth_status(&self, session_id: Option<&SessionId>) -> AuthResult<bool> {
        let Some(session_id) = session_id else {
            return Ok(false);
        };
        let Some(record) = self.sessions.get(session_id)? else {
            return Ok(false);
        };
        Ok(record.active_credentials().is_some())
    }

    /// Active provider and its credentials, for the API proxy layer.
    ///
    /// Every proxied operation calls this before making any outbound
    /// request, so unauthenticated calls never reach a provider.
    pub fn active_credentials(
        &self,
        session_id: Option<&SessionId>,
    ) -> AuthResult<(ProviderKind, ProviderCredentials)> {
        let session_id = session_id.ok_or(AuthError::NotAuthenticated)?;
        let record = self
            .sessions
            .get(session_id)?
            .ok_or(AuthError::NotAuthenticated)?;
        record
            .active_credentials()
            .map(|(kind, creds)| (kind, creds.clone()))
            .ok_or(AuthError::NotAuthenticated)
    }
}
