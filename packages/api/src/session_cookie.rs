// ABOUTME: Session cookie parsing and construction
// ABOUTME: The cookie carries only the opaque session id; all state stays server-side

use axum::http::{header, HeaderMap};

use gitgauge_auth::SessionId;

pub const SESSION_COOKIE: &str = "gitgauge_sid";

/// Extract the session id from the request's Cookie header, if present.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| SessionId::from(value))
    })
}

/// Session cookie with a fixed Max-Age matching the server-side TTL.
pub fn build_session_cookie(id: &SessionId, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax")
}
