//! JSON view models returned by the UI handlers.
//!
//! Every page is `{view, isLibrarian, userFullName, csrf, model}`; `view`
//! names the page a renderer should use.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use domain::{CSRF_HEADER_NAME, CSRF_PARAM_NAME};

use crate::session::Session;

pub const BOOKS_LIST: &str = "books/list";
pub const BOOKS_DETAIL: &str = "books/detail";
pub const USERS_LIST: &str = "users/list";
pub const USERS_DETAIL: &str = "users/detail";
pub const ERROR_403: &str = "error/403";
pub const ERROR_404: &str = "error/404";

/// CSRF token and where to send it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfView {
    pub header_name: &'static str,
    pub parameter_name: &'static str,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel<T> {
    #[serde(skip)]
    status: StatusCode,
    pub view: &'static str,
    pub is_librarian: bool,
    pub user_full_name: String,
    pub csrf: Option<CsrfView>,
    pub model: T,
}

impl<T: Serialize> ViewModel<T> {
    /// View for a signed-in user.
    pub fn new(view: &'static str, session: &Session, model: T) -> Self {
        Self {
            status: StatusCode::OK,
            view,
            is_librarian: session.is_librarian(),
            user_full_name: session.identity.display_name().to_string(),
            csrf: Some(CsrfView {
                header_name: CSRF_HEADER_NAME,
                parameter_name: CSRF_PARAM_NAME,
                token: session.csrf_token.clone(),
            }),
            model,
        }
    }

    /// View for a request without a session.
    pub fn anonymous(view: &'static str, model: T) -> Self {
        Self {
            status: StatusCode::OK,
            view,
            is_librarian: false,
            user_full_name: String::new(),
            csrf: None,
            model,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T: Serialize> IntoResponse for ViewModel<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
