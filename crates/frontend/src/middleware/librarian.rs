//! Librarian-only area guard.

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};

use crate::session::Session;

/// Path of the access-denied page.
pub const ACCESS_DENIED_PATH: &str = "/error/403";

/// Sends non-librarians to the access-denied page.
pub async fn require_librarian(
    Extension(session): Extension<Session>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if session.is_librarian() {
        next.run(request).await
    } else {
        tracing::info!(
            user_name = %session.user_name(),
            uri = %request.uri(),
            "Librarian area denied"
        );
        Redirect::to(ACCESS_DENIED_PATH).into_response()
    }
}
