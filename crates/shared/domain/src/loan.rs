//! Loan domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::book::Book;

/// An active loan of one book to one user.
///
/// Created on borrow and deleted on return; a book has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    /// Backend-assigned identifier
    pub loan_id: i64,
    /// Borrowing user
    pub user_name: String,
    /// Borrowed book
    pub book: Book,
    pub borrowed_at: DateTime<Utc>,
}

/// Body of a borrow request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BorrowRequest {
    /// ISBN of the book to borrow
    pub isbn: String,
}
