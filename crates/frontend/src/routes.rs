//! Route configuration.

use axum::{middleware, response::Redirect, routing::get, Router};

use domain::UI_BASE_PATH;

use crate::handlers::{admin_routes, auth_routes, error_routes, health_routes, library_routes};
use crate::middleware::{csrf_middleware, log_request, require_librarian, session_middleware};
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Layers run bottom-up: session guard, then CSRF, then handlers
    let ui = library_routes()
        .nest(
            "/admin",
            admin_routes().route_layer(middleware::from_fn(require_librarian)),
        )
        .route_layer(middleware::from_fn(csrf_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(middleware::from_fn(log_request));

    Router::new()
        .route("/", get(|| async { Redirect::to(&format!("{}/books", UI_BASE_PATH)) }))
        // Health check (no session)
        .nest("/health", health_routes())
        .nest("/error", error_routes())
        .merge(auth_routes())
        // Library UI (session required)
        .nest(UI_BASE_PATH, ui)
        .with_state(state)
}
