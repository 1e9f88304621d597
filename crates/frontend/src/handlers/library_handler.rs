//! Catalog and personal lending pages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use serde_json::json;
use tracing::info;

use common::AppResult;
use domain::{Book, Loan, Page, UserWithLoans, DEFAULT_BOOK_SORT};

use super::SearchParams;
use crate::extractors::ValidatedQuery;
use crate::session::Session;
use crate::state::AppState;
use crate::views::{ViewModel, BOOKS_DETAIL, BOOKS_LIST, ERROR_404, USERS_DETAIL};

/// Create library routes.
pub fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books))
        .route("/books/:isbn", get(book_detail))
        .route("/me", get(my_account))
        .route("/me/borrowBook/:isbn", post(borrow_book))
        .route("/me/returnBook/:loan_id", post(return_book))
}

/// Paginated book search.
pub async fn list_books(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> AppResult<ViewModel<Page<Book>>> {
    let query = params.into_query(DEFAULT_BOOK_SORT)?;
    let page = state
        .library
        .search_books(&session.access_token(), &query)
        .await?;

    Ok(ViewModel::new(BOOKS_LIST, &session, page))
}

/// Single book, or the not-found page.
pub async fn book_detail(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(isbn): Path<String>,
) -> AppResult<Response> {
    let book = state
        .library
        .get_book_by_isbn(&session.access_token(), &isbn)
        .await?;

    Ok(match book {
        Some(book) => ViewModel::new(BOOKS_DETAIL, &session, book).into_response(),
        None => ViewModel::new(ERROR_404, &session, json!({ "isbn": isbn }))
            .with_status(StatusCode::NOT_FOUND)
            .into_response(),
    })
}

/// The signed-in user's account with their loans.
pub async fn my_account(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<Response> {
    let user_name = session.user_name();
    let account = state
        .library
        .get_user_with_loans(&session.access_token(), user_name)
        .await?;

    Ok(user_detail_view(&session, user_name, account))
}

/// Borrow a book for the signed-in user.
pub async fn borrow_book(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Loan>> {
    let loan = state
        .library
        .borrow_book(&session.access_token(), &isbn, session.user_name())
        .await?;

    info!(user_name = %session.user_name(), isbn = %isbn, loan_id = loan.loan_id, "Book borrowed");
    Ok(Json(loan))
}

/// Return one of the signed-in user's loans.
pub async fn return_book(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(loan_id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .library
        .return_book(&session.access_token(), loan_id, session.user_name())
        .await?;

    info!(user_name = %session.user_name(), loan_id, "Book returned");
    Ok(StatusCode::OK)
}

/// `users/detail`, or the not-found page naming the user.
pub(crate) fn user_detail_view(
    session: &Session,
    user_name: &str,
    account: Option<UserWithLoans>,
) -> Response {
    match account {
        Some(account) => ViewModel::new(USERS_DETAIL, session, account).into_response(),
        None => ViewModel::new(ERROR_404, session, json!({ "userName": user_name }))
            .with_status(StatusCode::NOT_FOUND)
            .into_response(),
    }
}
