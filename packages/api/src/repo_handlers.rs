// ABOUTME: HTTP request handlers proxying read-only provider API calls
// ABOUTME: Every handler resolves session credentials before touching the provider

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use tracing::info;

use gitgauge_providers::Profile;

use crate::lines::{count_repo_lines, LineCountResult};
use crate::response::ApiError;
use crate::session_cookie::session_id_from_headers;
use crate::AppState;

/// `GET /profile`: normalized profile including the public repo count.
pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Profile>, ApiError> {
    let session_id = session_id_from_headers(&headers);
    let (kind, creds) = state.flow.active_credentials(session_id.as_ref())?;
    let adapter = state.flow.registry().get(kind)?;

    let profile = adapter.fetch_profile(&creds.access_token).await?;
    Ok(Json(profile))
}

/// `GET /repos`: the provider-native repository list, passed through
/// unmodified. Repo shapes are intentionally not unified across providers.
pub async fn repos(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session_id = session_id_from_headers(&headers);
    let (kind, creds) = state.flow.active_credentials(session_id.as_ref())?;
    let adapter = state.flow.registry().get(kind)?;

    let repos = adapter.list_repos(&creds.access_token).await?;
    Ok(Json(repos))
}

/// `GET /repo-lines/{owner_or_id}/{repo_name}`: total newline-delimited
/// line count across every file in the repository's default tree.
pub async fn repo_lines(
    State(state): State<AppState>,
    Path((owner_or_id, repo_name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<LineCountResult>, ApiError> {
    let session_id = session_id_from_headers(&headers);
    let (kind, creds) = state.flow.active_credentials(session_id.as_ref())?;
    let adapter = state.flow.registry().get(kind)?;

    info!("Counting lines for {} repo {}/{}", kind, owner_or_id, repo_name);
    let result = count_repo_lines(adapter, &creds.access_token, &owner_or_id, &repo_name).await?;
    Ok(Json(result))
}
