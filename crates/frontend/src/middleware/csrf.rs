//! CSRF protection for state-changing requests.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, Method, Uri},
    middleware::Next,
    response::Response,
    Extension,
};
use subtle::ConstantTimeEq;

use common::AppError;
use domain::{CSRF_HEADER_NAME, CSRF_PARAM_NAME};

use crate::session::Session;

/// Rejects unsafe methods that do not carry the session's CSRF token.
///
/// Must run inside the session guard.
pub async fn csrf_middleware(
    Extension(session): Extension<Session>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if requires_token(request.method()) {
        verify(&session, request.headers(), request.uri())?;
    }
    Ok(next.run(request).await)
}

pub fn requires_token(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Check the token from the `X-CSRF-TOKEN` header or `_csrf` query parameter.
pub fn verify(session: &Session, headers: &HeaderMap, uri: &Uri) -> Result<(), AppError> {
    match presented_token(headers, uri) {
        Some(token) if matches_session(&token, session) => Ok(()),
        Some(_) => {
            tracing::warn!(user_name = %session.user_name(), "CSRF token mismatch");
            Err(AppError::Forbidden)
        }
        None => {
            tracing::warn!(user_name = %session.user_name(), "CSRF token missing");
            Err(AppError::Forbidden)
        }
    }
}

fn matches_session(token: &str, session: &Session) -> bool {
    token.as_bytes().ct_eq(session.csrf_token.as_bytes()).into()
}

fn presented_token(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    if let Some(value) = headers.get(CSRF_HEADER_NAME).and_then(|v| v.to_str().ok()) {
        return Some(value.to_string());
    }

    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == CSRF_PARAM_NAME)
        .map(|(_, value)| value.into_owned())
}
