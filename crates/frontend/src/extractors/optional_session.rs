//! Session lookup for routes outside the session guard.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use common::AppError;

use crate::middleware::load_session;
use crate::session::Session;
use crate::state::AppState;

/// The caller's session when the cookie references a stored one.
///
/// Unlike the guard this never redirects and never refreshes tokens.
pub struct OptionalSession(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalSession(load_session(state, &parts.headers).await?))
    }
}
