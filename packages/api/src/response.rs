// ABOUTME: Error-to-HTTP translation and redirect helpers for the handler boundary
// ABOUTME: 400 for caller-input errors, 401 for authentication gaps, 500 for upstream/session failures

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use gitgauge_auth::AuthError;
use gitgauge_providers::ProviderError;

/// JSON error body, matching what the frontend already expects.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler-boundary error wrapper. Every handler returns
/// `Result<_, ApiError>`; the status mapping lives here and nowhere else.
#[derive(Debug)]
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        Self(AuthError::Provider(err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self(AuthError::Provider(ProviderError::Json(err)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AuthError::MissingCode => StatusCode::BAD_REQUEST,
            AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Provider(ProviderError::UnknownProvider(_)) => StatusCode::BAD_REQUEST,
            AuthError::Provider(_) | AuthError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self.0);
        }

        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// 302 redirect, as the OAuth dance and the original frontend expect.
pub fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

/// 302 redirect that also sets the session cookie.
pub fn found_with_cookie(location: &str, cookie: String) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response()
}
