// ABOUTME: Capability trait every provider adapter implements
// ABOUTME: One concrete implementation per provider, selected through the registry

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::kind::ProviderKind;
use crate::types::{NormalizedUser, Profile};

/// Everything the relay needs from a source-control provider.
///
/// Adding a provider means implementing this trait and registering it;
/// no call site branches on the provider name.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Authorization URL the browser is redirected to at login.
    fn build_auth_url(&self) -> ProviderResult<String>;

    /// Exchange an authorization code for a bearer access token.
    ///
    /// Codes are single-use; callers must not retry a failed exchange.
    async fn exchange_code(&self, code: &str) -> ProviderResult<String>;

    /// Fetch the authenticated identity and map it onto [`NormalizedUser`].
    async fn fetch_user(&self, access_token: &str) -> ProviderResult<NormalizedUser>;

    /// Fetch the extended profile, including the public repository count.
    async fn fetch_profile(&self, access_token: &str) -> ProviderResult<Profile>;

    /// List the caller's repositories.
    ///
    /// Returns the provider-native JSON unmodified; repo shapes are
    /// intentionally not unified across providers.
    async fn list_repos(&self, access_token: &str) -> ProviderResult<serde_json::Value>;

    /// Enumerate the blob (file) paths of a repository tree, recursively.
    async fn list_tree(
        &self,
        access_token: &str,
        owner_or_id: &str,
        repo: &str,
    ) -> ProviderResult<Vec<String>>;

    /// Fetch the raw textual content of one file.
    async fn fetch_file_content(
        &self,
        access_token: &str,
        owner_or_id: &str,
        repo: &str,
        path: &str,
    ) -> ProviderResult<String>;

    /// Best-effort provider-side token revocation. Callers treat failures
    /// as non-fatal; local logout proceeds regardless.
    async fn revoke_token(&self, access_token: &str) -> ProviderResult<()>;
}
