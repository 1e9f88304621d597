//! User and loan handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Router,
};

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{Loan, Page, User, UserPage, DEFAULT_USER_SORT};

use super::SearchParams;
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::middleware::{require_librarian, require_librarian_or_self, CurrentUser};
use crate::state::AppState;

/// Borrow request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BorrowBody {
    /// ISBN of the book to borrow
    #[validate(length(min = 1, message = "isbn is required"))]
    #[schema(example = "978-0743273565")]
    pub isbn: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_users))
        .route("/:user_name", get(get_user))
        .route("/:user_name/loans", get(list_loans).post(borrow_book))
        .route("/:user_name/loans/:loan_id", delete(return_book))
}

/// Search users (librarian only)
#[utoipa::path(
    get,
    path = "/library/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(SearchParams),
    responses(
        (status = 200, description = "Page of users", body = UserPage),
        (status = 400, description = "Invalid paging or sort parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Librarian only")
    )
)]
pub async fn search_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> AppResult<Json<Page<User>>> {
    require_librarian(&current_user)?;

    let query = params.into_query(DEFAULT_USER_SORT)?;
    let page = state.users.search_users(query).await?;
    Ok(Json(page))
}

/// Get user by user name (own profile or librarian)
#[utoipa::path(
    get,
    path = "/library/api/users/{userName}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("userName" = String, Path, description = "User name")
    ),
    responses(
        (status = 200, description = "User profile", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only view own profile unless librarian"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> AppResult<Json<User>> {
    require_librarian_or_self(&current_user, &user_name)?;

    let user = state.users.get_user(&user_name).await?;
    Ok(Json(user))
}

/// List active loans of a user (own loans or librarian)
#[utoipa::path(
    get,
    path = "/library/api/users/{userName}/loans",
    tag = "Loans",
    security(("bearer_auth" = [])),
    params(
        ("userName" = String, Path, description = "User name")
    ),
    responses(
        (status = 200, description = "Active loans", body = Vec<Loan>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_loans(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> AppResult<Json<Vec<Loan>>> {
    require_librarian_or_self(&current_user, &user_name)?;

    let loans = state.lending.loans_of(&user_name).await?;
    Ok(Json(loans))
}

/// Borrow a book (own account or librarian)
#[utoipa::path(
    post,
    path = "/library/api/users/{userName}/loans",
    tag = "Loans",
    security(("bearer_auth" = [])),
    params(
        ("userName" = String, Path, description = "User name")
    ),
    request_body = BorrowBody,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Missing ISBN or malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "Book already borrowed (code BOOK_ALREADY_BORROWED)")
    )
)]
pub async fn borrow_book(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_name): Path<String>,
    ValidatedJson(payload): ValidatedJson<BorrowBody>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    require_librarian_or_self(&current_user, &user_name)?;

    let isbn = payload.isbn.trim();
    if isbn.is_empty() {
        return Err(AppError::validation("isbn is required"));
    }

    let loan = state.lending.borrow_book(&user_name, isbn).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a borrowed book (own loan or librarian)
#[utoipa::path(
    delete,
    path = "/library/api/users/{userName}/loans/{loanId}",
    tag = "Loans",
    security(("bearer_auth" = [])),
    params(
        ("userName" = String, Path, description = "User name"),
        ("loanId" = i64, Path, description = "Loan ID")
    ),
    responses(
        (status = 204, description = "Loan closed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Loan not found for this user")
    )
)]
pub async fn return_book(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((user_name, loan_id)): Path<(String, i64)>,
) -> AppResult<StatusCode> {
    require_librarian_or_self(&current_user, &user_name)?;

    state.lending.return_book(&user_name, loan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
