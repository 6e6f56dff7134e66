// ABOUTME: HTTP request handlers for the OAuth login, callback, and logout endpoints
// ABOUTME: Thin translation between HTTP and the exchange flow; no provider logic here

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use gitgauge_providers::NormalizedUser;

use crate::response::{found, found_with_cookie, ApiError};
use crate::session_cookie::{build_session_cookie, session_id_from_headers};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// `GET /auth/{provider}/login`: redirect the browser to the provider's
/// authorization endpoint. No session mutation.
pub async fn login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Response, ApiError> {
    info!("Login requested for provider: {}", provider);
    let url = state.flow.initiate_login(&provider)?;
    Ok(found(&url))
}

/// `GET /auth/{provider}/callback?code=...`: exchange the code, bind the
/// identity to the session, and send the browser back to the frontend.
///
/// The normalized user rides along as a URL-encoded query parameter in
/// addition to being stored server-side; the frontend depends on both.
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    info!("Callback received for provider: {}", provider);

    let existing = session_id_from_headers(&headers);
    let (session_id, user) = state
        .flow
        .handle_callback(existing.as_ref(), &provider, query.code.as_deref())
        .await?;

    let user_json = serde_json::to_string(&user)?;
    let location = format!(
        "{}/repos?user={}",
        state.frontend_url.trim_end_matches('/'),
        urlencoding::encode(&user_json)
    );
    let cookie = build_session_cookie(&session_id, state.session_ttl_secs);
    Ok(found_with_cookie(&location, cookie))
}

/// `GET /auth/status`: whether the session holds usable credentials.
/// Always 200; this endpoint is how the frontend decides what to render.
pub async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session_id = session_id_from_headers(&headers);
    let authenticated = state.flow.auth_status(session_id.as_ref())?;
    Ok(Json(json!({ "authenticated": authenticated })))
}

/// `GET /me`: the normalized user from the session, with no upstream call.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<NormalizedUser>, ApiError> {
    let session_id = session_id_from_headers(&headers);
    let (_, creds) = state.flow.active_credentials(session_id.as_ref())?;
    Ok(Json(creds.user))
}

/// `POST /logout`: clear the active provider's credentials. Idempotent.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session_id = session_id_from_headers(&headers);
    let kind = state.flow.logout(session_id.as_ref()).await?;
    Ok(Json(json!({ "message": format!("Logged out from {kind}") })))
}
