//! Incoming request logging for the UI routes.

use axum::{body::Body, extract::Request, middleware::Next, response::Response};

use domain::CSRF_HEADER_NAME;

/// Log method, URI and whether a CSRF header was sent (never its value).
pub async fn log_request(request: Request<Body>, next: Next) -> Response {
    tracing::info!(
        method = %request.method(),
        uri = %request.uri(),
        csrf_header = request.headers().contains_key(CSRF_HEADER_NAME),
        "Incoming request"
    );
    next.run(request).await
}
