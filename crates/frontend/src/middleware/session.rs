//! Session guard.
//!
//! Resolves the session cookie to a stored [`Session`] and refreshes the
//! access token shortly before it expires, so handlers always relay a live
//! token to the backend.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Duration;
use tracing::{debug, info, warn};

use common::{AppError, AppResult};

use crate::session::{Session, SESSION_COOKIE};
use crate::state::AppState;

/// Refresh access tokens expiring within this window.
pub const REFRESH_SKEW_SECONDS: i64 = 30;

/// Session middleware for every `/library/ui` route.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(session) = load_session(&state, request.headers()).await? else {
        return Ok(unauthenticated(request.method()));
    };

    let Some(session) = ensure_fresh(&state, session).await? else {
        return Ok(unauthenticated(request.method()));
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Session referenced by the request cookie, if it is still stored.
pub async fn load_session(state: &AppState, headers: &HeaderMap) -> AppResult<Option<Session>> {
    let jar = CookieJar::from_headers(headers);
    match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.sessions.load(cookie.value()).await,
        None => Ok(None),
    }
}

/// Refresh the session's tokens when they are about to expire.
///
/// Returns `None` when the session had to be ended. A provider that rejects
/// the refresh token ends the session; an unreachable provider does not.
async fn ensure_fresh(state: &AppState, mut session: Session) -> AppResult<Option<Session>> {
    if !session
        .tokens
        .expires_within(Duration::seconds(REFRESH_SKEW_SECONDS))
    {
        return Ok(Some(session));
    }

    if session.tokens.refresh_token.is_none() {
        if session.tokens.is_expired() {
            info!(user_name = %session.user_name(), "Session expired");
            state.sessions.delete(&session.id).await?;
            return Ok(None);
        }
        return Ok(Some(session));
    }

    match state.oidc.refresh(&session.tokens).await {
        Ok(tokens) => {
            debug!(user_name = %session.user_name(), "Access token refreshed");
            session.tokens = tokens;
            state.sessions.save(&session).await?;
            Ok(Some(session))
        }
        Err(AppError::Unauthorized) => {
            info!(user_name = %session.user_name(), "Token refresh rejected, ending session");
            state.sessions.delete(&session.id).await?;
            Ok(None)
        }
        Err(e) if !session.tokens.is_expired() => {
            warn!(
                user_name = %session.user_name(),
                error = %e,
                "Token refresh unavailable, relaying current token"
            );
            Ok(Some(session))
        }
        Err(e) => {
            warn!(user_name = %session.user_name(), error = %e, "Token refresh unavailable");
            Err(AppError::service_unavailable("identity provider"))
        }
    }
}

/// Browsers navigating are sent to login; other requests get 401.
fn unauthenticated(method: &Method) -> Response {
    if method == Method::GET || method == Method::HEAD {
        Redirect::to("/login").into_response()
    } else {
        AppError::Unauthorized.into_response()
    }
}
