// ABOUTME: GitLab adapter implementing the provider capability trait
// ABOUTME: Projects are addressed by numeric id or URL-encoded path, not owner/repo

use async_trait::async_trait;
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

/// Branch the raw-file endpoint is pinned to when counting lines.
const RAW_FILE_REF: &str = "main";

#[derive(Debug, Deserialize)]
struct GitlabUser {
    id: i64,
    username: String,
    name: Option<String>,
    avatar_url: Option<String>,
    email: Option<String>,
    /// Not part of the documented user payload on all GitLab versions;
    /// defaults to zero when absent.
    #[serde(default)]
    public_projects_count: i64,
}

pub struct GitlabAdapter {
    config: ProviderConfig,
    client: Client,
}

impl GitlabAdapter {
    pub fn new(config: ProviderConfig, client: Client) -> Self {
        Self { config, client }
    }

    async fn get(
        &self,
        url: &str,
        access_token: &str,
        context: &str,
    ) -> ProviderResult<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::upstream(response.status(), context));
        }
        Ok(response)
    }

    async fn user(&self, access_token: &str) -> ProviderResult<GitlabUser> {
        let url = format!("{}/user", self.config.api_base);
        let response = self.get(&url, access_token, "user").await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ProviderAdapter for GitlabAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gitlab
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
        // GitLab requires the grant type and the exact redirect_uri used at
        // initiation; a mismatched redirect_uri is rejected.
        let response = self
            .client
            .post(&self.config.token_url)
            .json(&json!({
                "client_id": self.config.client_id,
                "client_secret": self.config.client_secret,
                "code": code,
                "grant_type": "authorization_code",
                "redirect_uri": self.config.redirect_uri,
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
            username: user.username,
            name: user.name,
            avatar: user.avatar_url,
            public_repos: user.public_projects_count,
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> ProviderResult<Profile> {
        let user = self.user(access_token).await?;

        // The user payload has no reliable public project count; list the
        // user's public projects and count them.
        let url = format!(
            "{}/users/{}/projects?visibility=public",
            self.config.api_base, user.id
        );
        let projects: Vec<serde_json::Value> = self
            .get(&url, access_token, "public projects")
            .await?
            .json()
            .await?;

        Ok(Profile {
            id: user.id,
            username: user.username,
            name: user.name,
            avatar_url: user.avatar_url,
            email: user.email,
            public_repos: projects.len() as i64,
        })
    }

    async fn list_repos(&self, access_token: &str) -> ProviderResult<serde_json::Value> {
        let url = format!("{}/projects?membership=true", self.config.api_base);
        let response = self.get(&url, access_token, "project list").await?;
        Ok(response.json().await?)
    }

    async fn list_tree(
        &self,
        access_token: &str,
        owner_or_id: &str,
        _repo: &str,
    ) -> ProviderResult<Vec<String>> {
        let url = format!(
            "{}/projects/{}/repository/tree?recursive=true",
            self.config.api_base,
            urlencoding::encode(owner_or_id)
        );
        let entries: Vec<TreeEntry> = self
            .get(&url, access_token, "repository tree")
            .await?
            .json()
            .await?;

        debug!("Listed {} tree entries for project {}", entries.len(), owner_or_id);

        Ok(entries
            .into_iter()
            .filter(TreeEntry::is_blob)
            .map(|e| e.path)
            .collect())
    }

    async fn fetch_file_content(
        &self,
        access_token: &str,
        owner_or_id: &str,
        _repo: &str,
        path: &str,
    ) -> ProviderResult<String> {
        let url = format!(
            "{}/projects/{}/repository/files/{}/raw?ref={}",
            self.config.api_base,
            urlencoding::encode(owner_or_id),
            urlencoding::encode(path),
            RAW_FILE_REF
        );
        let response = self.get(&url, access_token, "file content").await?;
        Ok(response.text().await?)
    }

    async fn revoke_token(&self, access_token: &str) -> ProviderResult<()> {
        // The revocation endpoint lives next to the token endpoint.
        let Some(oauth_base) = self.config.token_url.strip_suffix("/token") else {
            debug!("Token URL has no /token suffix; skipping revocation");
            return Ok(());
        };

        let response = self
            .client
            .post(format!("{oauth_base}/revoke"))
            .json(&json!({
                "client_id": self.config.client_id,
                "client_secret": self.config.client_secret,
                "token": access_token,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::upstream(response.status(), "token revocation"));
        }
        Ok(())
    }
}
