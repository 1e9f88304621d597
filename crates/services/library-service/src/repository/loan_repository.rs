//! Loan repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::warn;

use super::entities::book::Entity as BookEntity;
use super::entities::loan::{self, ActiveModel, Entity as LoanEntity};
use common::{AppError, AppResult};
use domain::{Book, Loan};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Loan repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Active loans of a user, oldest first
    async fn find_by_user(&self, user_name: &str) -> AppResult<Vec<Loan>>;

    /// Find loan by ID
    async fn find_by_id(&self, loan_id: i64) -> AppResult<Option<Loan>>;

    /// Whether the book with this ISBN is currently on loan
    async fn exists_for_isbn(&self, isbn: &str) -> AppResult<bool>;

    /// Record a new loan.
    ///
    /// Fails with `BookAlreadyBorrowed` when another loan for the ISBN was
    /// inserted concurrently.
    async fn create(&self, user_name: &str, book: &Book) -> AppResult<Loan>;

    /// Delete loan by ID
    async fn delete(&self, loan_id: i64) -> AppResult<()>;
}

/// Concrete implementation of LoanRepository
pub struct LoanStore {
    db: DatabaseConnection,
}

impl LoanStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoanRepository for LoanStore {
    async fn find_by_user(&self, user_name: &str) -> AppResult<Vec<Loan>> {
        let rows = LoanEntity::find()
            .filter(loan::Column::UserName.eq(user_name))
            .order_by_asc(loan::Column::BorrowedAt)
            .order_by_asc(loan::Column::Id)
            .find_also_related(BookEntity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(loan, book)| match book {
                Some(book) => Some(loan.into_loan(book.into_book(false))),
                None => {
                    warn!("Loan {} references missing book {}", loan.id, loan.isbn);
                    None
                }
            })
            .collect())
    }

    async fn find_by_id(&self, loan_id: i64) -> AppResult<Option<Loan>> {
        let row = LoanEntity::find_by_id(loan_id)
            .find_also_related(BookEntity)
            .one(&self.db)
            .await?;

        Ok(match row {
            Some((loan, Some(book))) => Some(loan.into_loan(book.into_book(false))),
            _ => None,
        })
    }

    async fn exists_for_isbn(&self, isbn: &str) -> AppResult<bool> {
        let count = LoanEntity::find()
            .filter(loan::Column::Isbn.eq(isbn))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn create(&self, user_name: &str, book: &Book) -> AppResult<Loan> {
        let active_model = ActiveModel {
            id: NotSet,
            user_name: Set(user_name.to_string()),
            isbn: Set(book.isbn.clone()),
            borrowed_at: Set(chrono::Utc::now()),
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(model.into_loan(book.clone())),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(AppError::BookAlreadyBorrowed(book.isbn.clone()))
                }
                _ => Err(AppError::from(err)),
            },
        }
    }

    async fn delete(&self, loan_id: i64) -> AppResult<()> {
        let result = LoanEntity::delete_by_id(loan_id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
