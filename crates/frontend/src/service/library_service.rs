//! Library service - aggregates backend calls for the UI handlers.

use std::sync::Arc;

use domain::{Book, Loan, Page, SearchQuery, User, UserWithLoans};

use crate::clients::{AccessToken, BackendClient, BackendResult};

/// Facade over the backend client used by the request handlers.
pub struct LibraryService {
    backend: Arc<dyn BackendClient>,
}

impl LibraryService {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self { backend }
    }

    pub async fn search_books(
        &self,
        token: &AccessToken,
        query: &SearchQuery,
    ) -> BackendResult<Page<Book>> {
        self.backend.search_books(token, query).await
    }

    pub async fn get_book_by_isbn(
        &self,
        token: &AccessToken,
        isbn: &str,
    ) -> BackendResult<Option<Book>> {
        self.backend.get_book_by_isbn(token, isbn).await
    }

    pub async fn search_users(
        &self,
        token: &AccessToken,
        query: &SearchQuery,
    ) -> BackendResult<Page<User>> {
        self.backend.search_users(token, query).await
    }

    pub async fn get_user(
        &self,
        token: &AccessToken,
        user_name: &str,
    ) -> BackendResult<Option<User>> {
        self.backend.get_user(token, user_name).await
    }

    /// The user and their loans; the loans endpoint is only called when the
    /// user exists.
    pub async fn get_user_with_loans(
        &self,
        token: &AccessToken,
        user_name: &str,
    ) -> BackendResult<Option<UserWithLoans>> {
        let Some(user) = self.backend.get_user(token, user_name).await? else {
            return Ok(None);
        };

        let loans = self
            .backend
            .get_borrowed_books_of_user(token, user_name)
            .await?;
        Ok(Some(UserWithLoans::new(user, loans)))
    }

    pub async fn borrow_book(
        &self,
        token: &AccessToken,
        isbn: &str,
        user_name: &str,
    ) -> BackendResult<Loan> {
        self.backend.borrow_book(token, isbn, user_name).await
    }

    pub async fn return_book(
        &self,
        token: &AccessToken,
        loan_id: i64,
        user_name: &str,
    ) -> BackendResult<()> {
        self.backend.return_book(token, loan_id, user_name).await
    }
}
