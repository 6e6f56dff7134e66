// ABOUTME: GitHub adapter implementing the provider capability trait
// ABOUTME: Covers the OAuth web flow plus the user/repos/trees/contents REST endpoints

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::adapter::ProviderAdapter;
use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::kind::ProviderKind;
use crate::types::{NormalizedUser, Profile, TokenResponse, TreeEntry};

/// Raw content media type for the contents API.
const RAW_ACCEPT: &str = "application/vnd.github.v3.raw";

#[derive(Debug, Deserialize)]
struct GithubUser {
    #[serde(default)]
    id: i64,
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
    email: Option<String>,
    #[serde(default)]
    public_repos: i64,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

pub struct GithubAdapter {
    config: ProviderConfig,
    client: Client,
}

impl GithubAdapter {
    pub fn new(config: ProviderConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Authenticated GET against the GitHub API, with an upstream error
    /// when the response status is non-success.
    async fn get(
        &self,
        url: &str,
        access_token: &str,
        accept: &str,
        context: &str,
    ) -> ProviderResult<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header(ACCEPT, accept)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::upstream(response.status(), context));
        }
        Ok(response)
    }

    async fn user(&self, access_token: &str) -> ProviderResult<GithubUser> {
        let url = format!("{}/user", self.config.api_base);
        let response = self
            .get(&url, access_token, "application/json", "user")
            .await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ProviderAdapter for GithubAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Github
    }

    fn build_auth_url(&self) -> ProviderResult<String> {
        let mut url = Url::parse(&self.config.auth_url)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scopes)
            .append_pair("response_type", "code");
        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> ProviderResult<String> {
        let response = self
            .client
            .post(&self.config.token_url)
            .header(ACCEPT, "application/json")
            .json(&json!({
                "client_id": self.config.client_id,
                "client_secret": self.config.client_secret,
                "code": code,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::upstream(response.status(), "token exchange"));
        }

        let token: TokenResponse = response.json().await?;
        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::TokenExchangeFailed)
    }

    async fn fetch_user(&self, access_token: &str) -> ProviderResult<NormalizedUser> {
        let user = self.user(access_token).await?;
        Ok(NormalizedUser {
            username: user.login,
            name: user.name,
            avatar: user.avatar_url,
            public_repos: user.public_repos,
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> ProviderResult<Profile> {
        // GitHub exposes the public repo count directly on the user object;
        // no second call needed.
        let user = self.user(access_token).await?;
        Ok(Profile {
            id: user.id,
            username: user.login,
            name: user.name,
            avatar_url: user.avatar_url,
            email: user.email,
            public_repos: user.public_repos,
        })
    }

    async fn list_repos(&self, access_token: &str) -> ProviderResult<serde_json::Value> {
        let url = format!("{}/user/repos", self.config.api_base);
        let response = self
            .get(&url, access_token, "application/json", "repository list")
            .await?;
        Ok(response.json().await?)
    }

    async fn list_tree(
        &self,
        access_token: &str,
        owner_or_id: &str,
        repo: &str,
    ) -> ProviderResult<Vec<String>> {
        // Default branch first, then the full recursive tree for it.
        let url = format!("{}/repos/{}/{}", self.config.api_base, owner_or_id, repo);
        let info: RepoInfo = self
            .get(&url, access_token, "application/json", "repository metadata")
            .await?
            .json()
            .await?;

        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.config.api_base, owner_or_id, repo, info.default_branch
        );
        let tree: TreeResponse = self
            .get(&url, access_token, "application/json", "repository tree")
            .await?
            .json()
            .await?;

        debug!(
            "Listed {} tree entries for {}/{}",
            tree.tree.len(),
            owner_or_id,
            repo
        );

        Ok(tree
            .tree
            .into_iter()
            .filter(TreeEntry::is_blob)
            .map(|e| e.path)
            .collect())
    }

    async fn fetch_file_content(
        &self,
        access_token: &str,
        owner_or_id: &str,
        repo: &str,
        path: &str,
    ) -> ProviderResult<String> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base, owner_or_id, repo, path
        );
        let response = self
            .get(&url, access_token, RAW_ACCEPT, "file content")
            .await?;
        Ok(response.text().await?)
    }

    async fn revoke_token(&self, access_token: &str) -> ProviderResult<()> {
        let url = format!(
            "{}/applications/{}/token",
            self.config.api_base, self.config.client_id
        );
        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .json(&json!({ "access_token": access_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::upstream(response.status(), "token revocation"));
        }
        Ok(())
    }
}
