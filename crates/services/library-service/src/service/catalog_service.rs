//! Catalog service - book search and lookup.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppResult, OptionExt};
use domain::{Book, BookSort, Page, SearchQuery};

use crate::repository::BookRepository;

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Search books; `query.sort` must be a book sort key
    async fn search_books(&self, query: SearchQuery) -> AppResult<Page<Book>>;

    /// Get book by ISBN
    async fn get_book(&self, isbn: &str) -> AppResult<Book>;
}

/// Concrete implementation of CatalogService using repository.
pub struct Catalog {
    books: Arc<dyn BookRepository>,
}

impl Catalog {
    /// Create new catalog service instance with repository
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl CatalogService for Catalog {
    async fn search_books(&self, query: SearchQuery) -> AppResult<Page<Book>> {
        let sort: BookSort = query.sort.parse()?;
        self.books.search(&query, sort).await
    }

    async fn get_book(&self, isbn: &str) -> AppResult<Book> {
        self.books.find_by_isbn(isbn).await?.ok_or_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockBookRepository;
    use common::AppError;

    fn test_book(isbn: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: "The Hobbit".to_string(),
            author: "J. R. R. Tolkien".to_string(),
            publisher: None,
            published_year: Some(1937),
            available: true,
        }
    }

    #[tokio::test]
    async fn test_search_books_passes_parsed_sort() {
        let mut repo = MockBookRepository::new();
        repo.expect_search()
            .withf(|query, sort| query.page == 1 && *sort == BookSort::Author)
            .returning(|query, _| Ok(Page::new(vec![test_book("1")], query.page, query.size, 11)));

        let service = Catalog::new(Arc::new(repo));
        let query = SearchQuery::new(None, 1, 10, "author").unwrap();
        let page = service.search_books(query).await.unwrap();

        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_search_books_rejects_unknown_sort() {
        let mut repo = MockBookRepository::new();
        repo.expect_search().never();

        let service = Catalog::new(Arc::new(repo));
        let query = SearchQuery::new(None, 0, 10, "email").unwrap();
        let result = service.search_books(query).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_book_not_found() {
        let mut repo = MockBookRepository::new();
        repo.expect_find_by_isbn()
            .withf(|isbn| isbn == "missing")
            .returning(|_| Ok(None));

        let service = Catalog::new(Arc::new(repo));
        let result = service.get_book("missing").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
