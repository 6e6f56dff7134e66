// ABOUTME: In-memory session store keyed by an opaque cookie-carried identifier
// ABOUTME: Holds the active provider plus per-provider user/token credentials, with a fixed TTL

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use gitgauge_providers::{NormalizedUser, ProviderKind};

use crate::error::SessionError;

/// Default session lifetime: 24 hours, fixed rather than sliding.
pub const DEFAULT_TTL_SECS: i64 = 24 * 60 * 60;

/// Opaque session identifier carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A user identity and access token, always populated together.
///
/// Written and removed as one value, so a session can never hold a token
/// without its user record or vice versa.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub user: NormalizedUser,
    pub access_token: String,
}

/// Typed per-session state: one active provider at a time, credentials
/// for every provider the user has logged into retained side by side.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    pub active_provider: Option<ProviderKind>,
    pub credentials: HashMap<ProviderKind, ProviderCredentials>,
}

impl SessionRecord {
    /// Active provider together with its credentials, when both exist.
    pub fn active_credentials(&self) -> Option<(ProviderKind, &ProviderCredentials)> {
        let kind = self.active_provider?;
        self.credentials.get(&kind).map(|c| (kind, c))
    }
}

#[derive(Debug)]
struct Entry {
    record: SessionRecord,
    expires_at: DateTime<Utc>,
}

/// Server-side session storage.
///
/// All mutation happens under a single write lock, so concurrent
/// callbacks or logouts against the same session serialize instead of
/// interleaving. Expired entries are dropped lazily on access; there is
/// no background sweeper.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, Entry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Read a session record, dropping it first if the TTL has elapsed.
    pub fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionError> {
        let mut sessions = self.inner.write().map_err(|_| SessionError::Poisoned)?;
        match sessions.get(id) {
            Some(entry) if entry.expires_at > Utc::now() => Ok(Some(entry.record.clone())),
            Some(_) => {
                sessions.remove(id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Record a successful login: set the active provider and its
    /// credentials atomically. Reuses the caller's live session when one
    /// exists, otherwise creates a fresh one.
    pub fn login(
        &self,
        id: Option<&SessionId>,
        kind: ProviderKind,
        user: NormalizedUser,
        access_token: String,
    ) -> Result<SessionId, SessionError> {
        let mut sessions = self.inner.write().map_err(|_| SessionError::Poisoned)?;
        let now = Utc::now();

        let id = match id {
            Some(id) if sessions.get(id).is_some_and(|e| e.expires_at > now) => id.clone(),
            _ => {
                let id = SessionId::generate();
                sessions.insert(
                    id.clone(),
                    Entry {
                        record: SessionRecord::default(),
                        expires_at: now + self.ttl,
                    },
                );
                id
            }
        };

        // Entry exists by construction above.
        if let Some(entry) = sessions.get_mut(&id) {
            entry.record.active_provider = Some(kind);
            entry
                .record
                .credentials
                .insert(kind, ProviderCredentials { user, access_token });
        }

        Ok(id)
    }

    /// Clear the active provider's credentials. Idempotent: a session
    /// without credentials, or no session at all, is left as-is.
    pub fn logout(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut sessions = self.inner.write().map_err(|_| SessionError::Poisoned)?;
        if let Some(entry) = sessions.get_mut(id) {
            if let Some(kind) = entry.record.active_provider {
                entry.record.credentials.remove(&kind);
            }
        }
        Ok(())
    }

    /// Remove a session entirely.
    pub fn destroy(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut sessions = self.inner.write().map_err(|_| SessionError::Poisoned)?;
        sessions.remove(id);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, SessionError> {
        Ok(self.inner.read().map_err(|_| SessionError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, SessionError> {
        Ok(self.len()? == 0)
    }
}
