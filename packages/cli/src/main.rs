// ABOUTME: Server binary wiring config, provider registry, session store, and router
// ABOUTME: Reads .env, builds the relay, and serves it with CORS for the frontend origin

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;
use gitgauge_api::{create_router, AppState};
use gitgauge_auth::{OAuthFlow, SessionStore};
use gitgauge_providers::{ProviderKind, ProviderRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    println!("🚀 Starting Gitgauge relay server...");
    println!("📡 Server will run on http://localhost:{}", config.port);
    println!("🔗 CORS origin: {}", config.cors_origin);

    for kind in ProviderKind::all() {
        if !config.providers.iter().any(|p| p.kind == kind) {
            warn!("{} credentials not set; provider disabled", kind);
        }
    }

    let registry = ProviderRegistry::new(config.providers)?;
    if registry.is_empty() {
        warn!("No providers configured; every login attempt will fail");
    } else {
        println!("🔑 Providers: {:?}", registry.configured());
    }

    let flow = OAuthFlow::new(
        Arc::new(registry),
        SessionStore::new(config.session_ttl_secs),
    );
    let state = AppState {
        flow: Arc::new(flow),
        frontend_url: config.frontend_url,
        session_ttl_secs: config.session_ttl_secs,
    };

    // The session cookie needs credentialed CORS, which rules out wildcard
    // origins and headers.
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    let app = create_router(state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    println!("✅ Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
