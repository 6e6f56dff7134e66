// ABOUTME: Authentication layer: server-side sessions and the OAuth exchange flow
// ABOUTME: Binds provider tokens and normalized identities to cookie-carried sessions

pub mod error;
pub mod flow;
pub mod session;

pub use error::{AuthError, AuthResult};
pub use flow::OAuthFlow;
pub use session::{ProviderCredentials, SessionId, SessionRecord, SessionStore, DEFAULT_TTL_SECS};
