// ABOUTME: Normalized wire types shared by the OAuth flow and the API proxy
// ABOUTME: Field names match the contract the consuming frontend already depends on

use serde::{Deserialize, Serialize};

/// User identity normalized across providers.
///
/// Serialized in camelCase because the frontend receives this shape both
/// in the callback redirect URL and from `/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedUser {
    pub username: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub public_repos: i64,
}

/// Extended profile returned by `/profile`, including a public repository
/// count that GitLab only exposes through a second API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub public_repos: i64,
}

/// Token endpoint response body. `access_token` is optional so that a
/// well-formed error body from the provider surfaces as a token exchange
/// failure instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
}

/// One entry of a repository tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl TreeEntry {
    /// File-type entries, as opposed to directories/subtrees.
    pub fn is_blob(&self) -> bool {
        self.entry_type == "blob"
    }
}
