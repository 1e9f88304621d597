//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use common::{AppError, AppResult};
use domain::{has_role, Identity, BEARER_TOKEN_PREFIX, ROLE_LIBRARIAN};

use crate::state::AppState;

/// Current authenticated caller extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub identity: Identity,
}

impl CurrentUser {
    pub fn user_name(&self) -> &str {
        &self.identity.user_name
    }

    /// Check if the caller has the librarian role.
    pub fn is_librarian(&self) -> bool {
        has_role(&self.identity, ROLE_LIBRARIAN)
    }
}

/// Check if the caller has librarian privileges.
pub fn require_librarian(user: &CurrentUser) -> AppResult<()> {
    if user.is_librarian() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Librarians may act on any user, everyone else only on themselves.
pub fn require_librarian_or_self(user: &CurrentUser, user_name: &str) -> AppResult<()> {
    if user.identity.is(user_name) {
        Ok(())
    } else {
        require_librarian(user)
    }
}

/// Authentication middleware that validates bearer tokens.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request)?;

    let identity = state.token_validator.validate(&token)?;
    tracing::debug!(user_name = %identity.user_name, "Authenticated request");

    request.extensions_mut().insert(CurrentUser { identity });

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(request: &Request<Body>) -> AppResult<String> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(user_name: &str, roles: &[&str]) -> CurrentUser {
        CurrentUser {
            identity: Identity::new(user_name, roles.iter().map(|r| r.to_string())),
        }
    }

    #[test]
    fn test_self_access_allowed() {
        assert!(require_librarian_or_self(&caller("demo_user_1", &[]), "demo_user_1").is_ok());
    }

    #[test]
    fn test_other_user_requires_librarian() {
        let result = require_librarian_or_self(&caller("demo_user_1", &[]), "demo_user_2");
        assert!(matches!(result, Err(AppError::Forbidden)));

        let librarian = caller("librarian", &[ROLE_LIBRARIAN]);
        assert!(require_librarian_or_self(&librarian, "demo_user_2").is_ok());
    }
}
