// ABOUTME: Integration tests for the relay router against a mock provider
// ABOUTME: Exercises the full login/callback/proxy/logout lifecycle over HTTP

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use wiremock::matchers::{body_json, header as header_matcher, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gitgauge_api::{create_router, AppState};
use gitgauge_auth::{OAuthFlow, SessionStore};
use gitgauge_providers::{ProviderConfig, ProviderKind, ProviderRegistry};

const FRONTEND_URL: &str = "http://localhost:5173";

fn app_for(server: &MockServer) -> Router {
    let config = ProviderConfig {
        kind: ProviderKind::Github,
        auth_url: format!("{}/login/oauth/authorize", server.uri()),
        token_url: format!("{}/login/oauth/access_token", server.uri()),
        api_base: server.uri(),
        scopes: "read:user repo".to_string(),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "http://localhost:4000/auth/github/callback".to_string(),
    };
    let registry = ProviderRegistry::new(vec![config]).unwrap();
    let flow = OAuthFlow::new(Arc::new(registry), SessionStore::new(86400));
    create_router(AppState {
        flow: Arc::new(flow),
        frontend_url: FRONTEND_URL.to_string(),
        session_ttl_secs: 86400,
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

async fn body_json_of(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Mount the token exchange and user mocks, run the callback, and return
/// the session cookie ready to send on follow-up requests.
async fn login_via_callback(app: &Router, server: &MockServer) -> String {
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(body_json(json!({
            "client_id": "client-id",
            "client_secret": "client-secret",
            "code": "auth-code",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gho_token",
            "token_type": "bearer",
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header_matcher("authorization", "Bearer gho_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "login": "octocat",
            "name": "The Octocat",
            "avatar_url": "https://avatars.example/octocat",
            "public_repos": 8,
        })))
        .mount(server)
        .await;

    let response = app
        .clone()
        .oneshot(get("/auth/github/callback?code=auth-code"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with(&format!("{FRONTEND_URL}/repos?user=")));
    // The user also rides along in the redirect query, URL-encoded.
    assert!(location.contains("octocat"));

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie
        .split(';')
        .next()
        .unwrap()
        .trim()
        .to_string()
}

#[tokio::test]
async fn test_unauthenticated_requests_are_rejected_without_upstream_calls() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    for uri in ["/me", "/profile", "/repos", "/repo-lines/octocat/hello"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let body = body_json_of(response).await;
        assert!(body["error"].is_string());
    }

    // No request ever left the relay.
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_redirects_to_authorization_endpoint() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app.oneshot(get("/auth/github/login")).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with(&format!("{}/login/oauth/authorize?", server.uri())));
    assert!(location.contains("client_id=client-id"));
    assert!(location.contains("response_type=code"));
}

#[tokio::test]
async fn test_unknown_provider_is_a_bad_request() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app
        .clone()
        .oneshot(get("/auth/bitbucket/login"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/auth/bitbucket/callback?code=x"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_without_code_is_a_bad_request() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    for uri in ["/auth/github/callback", "/auth/github/callback?code="] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = body_json_of(response).await;
        assert!(body["error"].is_string());
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_token_exchange_surfaces_as_server_error() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    // A 200 with no access_token field, as GitHub returns for a bad code.
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "bad_verification_code",
        })))
        .mount(&server)
        .await;

    let response = app
        .clone()
        .oneshot(get("/auth/github/callback?code=stale"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The session was never authenticated.
    let response = app.oneshot(get("/auth/status")).await.unwrap();
    let body = body_json_of(response).await;
    assert_eq!(body, json!({ "authenticated": false }));
}

#[tokio::test]
async fn test_full_login_proxy_logout_lifecycle() {
    let server = MockServer::start().await;
    let app = app_for(&server);
    let cookie = login_via_callback(&app, &server).await;

    // Status flips to authenticated.
    let response = app
        .clone()
        .oneshot(get_with_cookie("/auth/status", &cookie))
        .await
        .unwrap();
    assert_eq!(body_json_of(response).await, json!({ "authenticated": true }));

    // /me is served from the session, no extra upstream call.
    let response = app
        .clone()
        .oneshot(get_with_cookie("/me", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json_of(response).await;
    assert_eq!(me["username"], "octocat");
    assert_eq!(me["publicRepos"], 8);

    // /repos passes the provider payload through unmodified.
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(header_matcher("authorization", "Bearer gho_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "hello", "stargazers_count": 3 },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let response = app
        .clone()
        .oneshot(get_with_cookie("/repos", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let repos = body_json_of(response).await;
    assert_eq!(repos[0]["stargazers_count"], 3);

    // /profile re-fetches the user for a fresh public repo count.
    let response = app
        .clone()
        .oneshot(get_with_cookie("/profile", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json_of(response).await;
    assert_eq!(profile["username"], "octocat");
    assert_eq!(profile["public_repos"], 8);

    // Logout revokes upstream and clears the session.
    Mock::given(method("DELETE"))
        .and(path("/applications/client-id/token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let response = app
        .clone()
        .oneshot(post_with_cookie("/logout", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    assert_eq!(body["message"], "Logged out from github");

    let response = app
        .clone()
        .oneshot(get_with_cookie("/me", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Logging out again is still a success.
    let response = app
        .oneshot(post_with_cookie("/logout", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_repo_lines_sums_every_file_once() {
    let server = MockServer::start().await;
    let app = app_for(&server);
    let cookie = login_via_callback(&app, &server).await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "default_branch": "main",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/git/trees/main"))
        .and(query_param("recursive", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tree": [
                { "path": "src", "type": "tree" },
                { "path": "src/main.rs", "type": "blob" },
                { "path": "README.md", "type": "blob" },
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    // "a\nb\n" counts 3 segments, "x" counts 1; directories are skipped.
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/contents/src/main.rs"))
        .and(header_matcher("accept", "application/vnd.github.v3.raw"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a\nb\n"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/contents/README.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x"))
        .expect(1)
        .mount(&server)
        .await;

    let response = app
        .oneshot(get_with_cookie("/repo-lines/octocat/hello", &cookie))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json_of(response).await, json!({ "totalLines": 4 }));
}

#[tokio::test]
async fn test_upstream_failure_during_count_is_a_server_error() {
    let server = MockServer::start().await;
    let app = app_for(&server);
    let cookie = login_via_callback(&app, &server).await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let response = app
        .oneshot(get_with_cookie("/repo-lines/octocat/hello", &cookie))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json_of(response).await;
    assert!(body["error"].is_string());
}
