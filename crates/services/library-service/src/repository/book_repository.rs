//! Book repository implementation.
//!
//! Availability is not a column: a book is available when no loan row
//! references its ISBN.

use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use super::contains_ignore_case;
use super::entities::book::{self, Entity as BookEntity};
use super::entities::loan::{self, Entity as LoanEntity};
use common::AppResult;
use domain::{Book, BookSort, Page, SearchQuery};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Book repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Search by title, author or ISBN (case-insensitive), one page at a time
    async fn search(&self, query: &SearchQuery, sort: BookSort) -> AppResult<Page<Book>>;

    /// Find book by ISBN
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;
}

/// Concrete implementation of BookRepository
pub struct BookStore {
    db: DatabaseConnection,
}

impl BookStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// ISBNs among `isbns` that currently have a loan.
    async fn loaned_isbns(&self, isbns: Vec<String>) -> AppResult<HashSet<String>> {
        if isbns.is_empty() {
            return Ok(HashSet::new());
        }

        let loans = LoanEntity::find()
            .filter(loan::Column::Isbn.is_in(isbns))
            .all(&self.db)
            .await?;

        Ok(loans.into_iter().map(|l| l.isbn).collect())
    }
}

fn sort_column(sort: BookSort) -> book::Column {
    match sort {
        BookSort::Title => book::Column::Title,
        BookSort::Author => book::Column::Author,
        BookSort::Isbn => book::Column::Isbn,
        BookSort::PublishedYear => book::Column::PublishedYear,
    }
}

#[async_trait]
impl BookRepository for BookStore {
    async fn search(&self, query: &SearchQuery, sort: BookSort) -> AppResult<Page<Book>> {
        let mut select = BookEntity::find();

        if let Some(filter) = query.search_filter() {
            select = select.filter(
                Condition::any()
                    .add(contains_ignore_case(book::Column::Title, filter))
                    .add(contains_ignore_case(book::Column::Author, filter))
                    .add(contains_ignore_case(book::Column::Isbn, filter)),
            );
        }

        // Secondary key keeps page boundaries stable for equal sort values
        let paginator = select
            .order_by_asc(sort_column(sort))
            .order_by_asc(book::Column::Isbn)
            .paginate(&self.db, query.size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(query.page).await?;

        let loaned = self
            .loaned_isbns(models.iter().map(|m| m.isbn.clone()).collect())
            .await?;

        let books = models
            .into_iter()
            .map(|model| {
                let available = !loaned.contains(&model.isbn);
                model.into_book(available)
            })
            .collect();

        Ok(Page::new(books, query.page, query.size, total))
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let Some(model) = BookEntity::find_by_id(isbn.to_string()).one(&self.db).await? else {
            return Ok(None);
        };

        let on_loan = LoanEntity::find()
            .filter(loan::Column::Isbn.eq(isbn))
            .one(&self.db)
            .await?
            .is_some();

        Ok(Some(model.into_book(!on_loan)))
    }
}
