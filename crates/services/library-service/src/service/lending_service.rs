//! Lending service - borrow and return workflow.
//!
//! A book has at most one active loan. Borrowing checks for an existing loan
//! first; the repository maps a unique-index violation at insert time to the
//! same error, so concurrent borrows of one ISBN yield exactly one loan.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use common::{AppError, AppResult, OptionExt};
use domain::Loan;

use crate::repository::{BookRepository, LoanRepository, UserRepository};

/// Lending service trait for dependency injection.
#[async_trait]
pub trait LendingService: Send + Sync {
    /// Active loans of a user; `NotFound` when the user does not exist
    async fn loans_of(&self, user_name: &str) -> AppResult<Vec<Loan>>;

    /// Borrow a book for a user
    async fn borrow_book(&self, user_name: &str, isbn: &str) -> AppResult<Loan>;

    /// Return a loan; `NotFound` when it does not exist or belongs to someone else
    async fn return_book(&self, user_name: &str, loan_id: i64) -> AppResult<()>;
}

/// Concrete implementation of LendingService using repositories.
pub struct LendingManager {
    users: Arc<dyn UserRepository>,
    books: Arc<dyn BookRepository>,
    loans: Arc<dyn LoanRepository>,
}

impl LendingManager {
    /// Create new lending service instance with repositories
    pub fn new(
        users: Arc<dyn UserRepository>,
        books: Arc<dyn BookRepository>,
        loans: Arc<dyn LoanRepository>,
    ) -> Self {
        Self { users, books, loans }
    }
}

#[async_trait]
impl LendingService for LendingManager {
    async fn loans_of(&self, user_name: &str) -> AppResult<Vec<Loan>> {
        self.users.find_by_user_name(user_name).await?.ok_or_not_found()?;
        self.loans.find_by_user(user_name).await
    }

    async fn borrow_book(&self, user_name: &str, isbn: &str) -> AppResult<Loan> {
        self.users.find_by_user_name(user_name).await?.ok_or_not_found()?;
        let book = self.books.find_by_isbn(isbn).await?.ok_or_not_found()?;

        if self.loans.exists_for_isbn(isbn).await? {
            return Err(AppError::BookAlreadyBorrowed(isbn.to_string()));
        }

        let loan = self.loans.create(user_name, &book).await?;
        info!(loan_id = loan.loan_id, user_name, isbn, "Book borrowed");
        Ok(loan)
    }

    async fn return_book(&self, user_name: &str, loan_id: i64) -> AppResult<()> {
        let loan = self.loans.find_by_id(loan_id).await?.ok_or_not_found()?;

        // Someone else's loan is reported exactly like a missing one
        if loan.user_name != user_name {
            return Err(AppError::NotFound);
        }

        self.loans.delete(loan_id).await?;
        info!(loan_id, user_name, "Book returned");
        Ok(())
    }
}
