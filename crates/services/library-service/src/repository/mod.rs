//! Repository layer for data access.

pub mod entities;
mod book_repository;
mod loan_repository;
mod user_repository;

pub use book_repository::{BookRepository, BookStore};
pub use loan_repository::{LoanRepository, LoanStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use book_repository::MockBookRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use loan_repository::MockLoanRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::ColumnTrait;

/// Case-insensitive substring match on a text column.
pub(crate) fn contains_ignore_case<C: ColumnTrait + 'static>(column: C, needle: &str) -> SimpleExpr {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", escaped))
}
