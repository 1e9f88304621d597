//! Book handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use common::AppResult;
use domain::{Book, BookPage, Page, DEFAULT_BOOK_SORT};

use super::SearchParams;
use crate::extractors::ValidatedQuery;
use crate::state::AppState;

/// Create book routes
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_books))
        .route("/:isbn", get(get_book))
}

/// Search books
#[utoipa::path(
    get,
    path = "/library/api/books",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(SearchParams),
    responses(
        (status = 200, description = "Page of books", body = BookPage),
        (status = 400, description = "Invalid paging or sort parameters"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> AppResult<Json<Page<Book>>> {
    let query = params.into_query(DEFAULT_BOOK_SORT)?;
    let page = state.catalog.search_books(query).await?;
    Ok(Json(page))
}

/// Get book by ISBN
#[utoipa::path(
    get,
    path = "/library/api/books/{isbn}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.catalog.get_book(&isbn).await?;
    Ok(Json(book))
}
