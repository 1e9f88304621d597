//! Error pages reachable by redirect.

use axum::{http::StatusCode, routing::get, Router};

use crate::extractors::OptionalSession;
use crate::state::AppState;
use crate::views::{ViewModel, ERROR_403};

/// Create error page routes.
pub fn error_routes() -> Router<AppState> {
    Router::new().route("/403", get(access_denied))
}

/// Access-denied page.
pub async fn access_denied(OptionalSession(session): OptionalSession) -> ViewModel<()> {
    let view = match &session {
        Some(session) => ViewModel::new(ERROR_403, session, ()),
        None => ViewModel::anonymous(ERROR_403, ()),
    };
    view.with_status(StatusCode::FORBIDDEN)
}
