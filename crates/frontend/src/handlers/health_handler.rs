//! Liveness of the frontend and its session store.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub sessions: SessionStoreHealth,
    /// Backend API the frontend relays to; not checked, calls need a user token
    pub backend_url: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStoreHealth {
    pub store: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// 200 while sessions can be read and written, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let error = state.sessions.ping().await.err().map(|e| {
        tracing::warn!(store = state.sessions.kind(), "Session store unreachable: {}", e);
        e.to_string()
    });

    let (code, status) = match error {
        None => (StatusCode::OK, "healthy"),
        Some(_) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };

    let response = HealthResponse {
        status,
        sessions: SessionStoreHealth {
            store: state.sessions.kind(),
            status,
            error,
        },
        backend_url: state.config.backend.base_url.clone(),
    };

    (code, Json(response))
}
