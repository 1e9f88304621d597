//! Library Frontend Library
//!
//! This crate provides the browser-facing tier: OIDC login, server-side
//! sessions, CSRF protection and JSON page models, relaying the user's access
//! token to the library backend API.

pub mod clients;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod session;
pub mod state;
pub mod views;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing::info;

use domain::API_BASE_PATH;

use crate::clients::{HttpBackendClient, OidcClient};
use crate::config::FrontendConfig;
use crate::routes::create_router;
use crate::service::LibraryService;
use crate::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::AppState;

/// Run the frontend standalone, with the backend URL from the environment.
///
/// `host` and `port` override `FRONTEND_HOST` and `FRONTEND_PORT`.
pub async fn run(
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = FrontendConfig::from_env();
    let host = host.unwrap_or_else(|| config.host.clone());
    let port = port.unwrap_or(config.port);
    run_server_with_config(&host, port, config).await
}

/// Run the frontend as an embedded component (for combined binary).
pub async fn run_embedded(
    host: &str,
    port: u16,
    backend_port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend_host = if host == "0.0.0.0" { "127.0.0.1" } else { host };

    let mut config = FrontendConfig::from_env();
    config.backend.base_url =
        format!("http://{}:{}{}", backend_host, backend_port, API_BASE_PATH);

    run_server_with_config(host, port, config).await
}

/// Session store for the configuration: Redis when a URL is set.
async fn session_store(
    config: &FrontendConfig,
) -> Result<Arc<dyn SessionStore>, Box<dyn std::error::Error>> {
    match &config.redis_url {
        Some(url) => Ok(Arc::new(
            RedisSessionStore::connect(url, config.session_ttl_seconds, config.login_ttl_seconds)
                .await?,
        )),
        None => {
            info!("REDIS_URL not set, keeping sessions in memory");
            Ok(Arc::new(MemorySessionStore::new(
                Duration::from_secs(config.session_ttl_seconds),
                Duration::from_secs(config.login_ttl_seconds),
            )))
        }
    }
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: FrontendConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    // Create clients
    let backend = Arc::new(HttpBackendClient::new(&config.backend)?);
    let oidc = Arc::new(OidcClient::new(config.oidc.clone(), &config.backend)?);
    info!("Relaying to library backend at {}", config.backend.base_url);

    let sessions = session_store(&config).await?;
    info!(store = sessions.kind(), "Session store ready");

    // Create app state
    let library = Arc::new(LibraryService::new(backend));
    let state = AppState::new(library, sessions, oidc, Arc::new(config));

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Library frontend listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
