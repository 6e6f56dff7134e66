// ABOUTME: HTTP API layer for Gitgauge providing REST endpoints and routing
// ABOUTME: Relays OAuth logins and read-only provider API calls for the web frontend

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use gitgauge_auth::OAuthFlow;

pub mod auth_handlers;
pub mod lines;
pub mod repo_handlers;
pub mod response;
pub mod session_cookie;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<OAuthFlow>,
    /// Base URL the callback redirects the browser back to.
    pub frontend_url: String,
    /// Session cookie lifetime; fixed, not sliding.
    pub session_ttl_secs: i64,
}

/// Creates the relay router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/auth/{provider}/login", get(auth_handlers::login))
        .route("/auth/{provider}/callback", get(auth_handlers::callback))
        .route("/auth/status", get(auth_handlers::status))
        .route("/me", get(auth_handlers::me))
        .route("/logout", post(auth_handlers::logout))
        .route("/profile", get(repo_handlers::profile))
        .route("/repos", get(repo_handlers::repos))
        .route(
            "/repo-lines/{owner_or_id}/{repo_name}",
            get(repo_handlers::repo_lines),
        )
        .with_state(state)
}
