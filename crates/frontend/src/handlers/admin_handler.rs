//! Librarian pages.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Extension, Router,
};

use common::AppResult;
use domain::{Page, User, DEFAULT_USER_SORT};

use super::library_handler::user_detail_view;
use super::SearchParams;
use crate::extractors::ValidatedQuery;
use crate::session::Session;
use crate::state::AppState;
use crate::views::{ViewModel, USERS_LIST};

/// Create admin routes. Callers must wrap them in the librarian guard.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:user_name", get(user_detail))
}

/// Paginated user search.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> AppResult<ViewModel<Page<User>>> {
    let query = params.into_query(DEFAULT_USER_SORT)?;
    let page = state
        .library
        .search_users(&session.access_token(), &query)
        .await?;

    Ok(ViewModel::new(USERS_LIST, &session, page))
}

/// Any user's account with their loans.
pub async fn user_detail(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(user_name): Path<String>,
) -> AppResult<Response> {
    let account = state
        .library
        .get_user_with_loans(&session.access_token(), &user_name)
        .await?;

    Ok(user_detail_view(&session, &user_name, account))
}
