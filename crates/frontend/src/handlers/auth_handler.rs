//! Login, login callback and logout.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, Uri},
    response::Redirect,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{info, warn};

use common::{AppError, AppResult};
use domain::UI_BASE_PATH;

use crate::extractors::OptionalSession;
use crate::middleware::csrf;
use crate::session::{Session, SESSION_COOKIE};
use crate::state::AppState;

/// Query parameters the identity provider sends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Create authentication routes.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/login/callback", get(callback))
        .route("/logout", post(logout))
}

/// Start the authorization-code flow.
pub async fn login(State(state): State<AppState>) -> AppResult<Redirect> {
    let (url, pending) = state.oidc.begin_login()?;
    state.sessions.save_pending(&pending).await?;

    info!("Redirecting to identity provider");
    Ok(Redirect::to(url.as_str()))
}

/// Finish the flow: exchange the code and start a session.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> AppResult<(CookieJar, Redirect)> {
    if let Some(error) = params.error {
        warn!(
            error = %error,
            description = params.error_description.as_deref().unwrap_or(""),
            "Identity provider returned an error"
        );
        return Err(AppError::Unauthorized);
    }

    let login_state = params
        .state
        .ok_or_else(|| AppError::bad_request("missing state"))?;
    let pending = state
        .sessions
        .take_pending(&login_state)
        .await?
        .ok_or_else(|| AppError::bad_request("unknown or expired login state"))?;
    let code = params
        .code
        .ok_or_else(|| AppError::bad_request("missing code"))?;

    let grant = state.oidc.exchange_code(&code, &pending).await?;
    let session = Session::new(grant.identity, grant.tokens);
    state.sessions.save(&session).await?;

    info!(user_name = %session.user_name(), librarian = session.is_librarian(), "User signed in");

    let cookie = Cookie::build((SESSION_COOKIE, session.id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies);

    Ok((jar.add(cookie), Redirect::to(&landing_page(&session))))
}

/// End the session locally and at the identity provider.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    OptionalSession(session): OptionalSession,
    headers: HeaderMap,
    uri: Uri,
) -> AppResult<(CookieJar, Redirect)> {
    let mut id_token = None;

    if let Some(session) = session {
        csrf::verify(&session, &headers, &uri)?;
        state.sessions.delete(&session.id).await?;
        info!(user_name = %session.user_name(), "User signed out");
        id_token = session.tokens.id_token;
    }

    let target = state
        .oidc
        .end_session_url(id_token.as_deref())
        .map(|url| url.to_string())
        .unwrap_or_else(|| "/".to_string());

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Redirect::to(&target)))
}

/// Librarians land on the user list, everyone else on their account.
fn landing_page(session: &Session) -> String {
    if session.is_librarian() {
        format!("{}/admin/users", UI_BASE_PATH)
    } else {
        format!("{}/me", UI_BASE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TokenSet;
    use chrono::Utc;
    use domain::{Identity, ROLE_LIBRARIAN};

    fn session(roles: &[&str]) -> Session {
        Session::new(
            Identity::new("someone", roles.iter().map(|r| r.to_string())),
            TokenSet {
                access_token: "a".to_string(),
                refresh_token: None,
                id_token: None,
                expires_at: Utc::now(),
            },
        )
    }

    #[test]
    fn test_landing_page_by_role() {
        assert_eq!(
            landing_page(&session(&[ROLE_LIBRARIAN])),
            "/library/ui/admin/users"
        );
        assert_eq!(landing_page(&session(&[])), "/library/ui/me");
    }
}
