//! HTTP client for the library backend API.
//!
//! Every call carries the caller's access token, which the request chain
//! relays as a bearer token. Absence (404) on lookups is `Ok(None)`; a 409
//! carrying `BOOK_ALREADY_BORROWED` on borrow is a typed conflict.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use common::error::ErrorResponse;
use common::{AppError, AppResult, HttpClientConfig};
use domain::{Book, BorrowRequest, Loan, Page, SearchQuery, User, BOOK_ALREADY_BORROWED};

use super::interceptors::{default_chain, RequestInterceptor};
use super::AccessToken;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Typed failure of a backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Book {isbn} is already borrowed")]
    AlreadyBorrowed { isbn: String, message: String },

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed backend response: {0}")]
    Decode(String),

    #[error("Access token cannot be sent as a header")]
    InvalidToken,
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Map backend outcomes to browser-facing errors.
impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::AlreadyBorrowed { isbn, .. } => AppError::BookAlreadyBorrowed(isbn),
            BackendError::InvalidToken => AppError::Unauthorized,
            BackendError::Status { status, message } if (400..500).contains(&status) => {
                AppError::Upstream { status, message }
            }
            other => AppError::bad_gateway(other.to_string()),
        }
    }
}

/// Backend API client trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// `GET /books`
    async fn search_books(&self, token: &AccessToken, query: &SearchQuery)
        -> BackendResult<Page<Book>>;

    /// `GET /books/{isbn}`; `None` on 404
    async fn get_book_by_isbn(&self, token: &AccessToken, isbn: &str)
        -> BackendResult<Option<Book>>;

    /// `GET /users`
    async fn search_users(&self, token: &AccessToken, query: &SearchQuery)
        -> BackendResult<Page<User>>;

    /// `GET /users/{userName}`; `None` on 404
    async fn get_user(&self, token: &AccessToken, user_name: &str)
        -> BackendResult<Option<User>>;

    /// `GET /users/{userName}/loans`; empty on 404
    async fn get_borrowed_books_of_user(&self, token: &AccessToken, user_name: &str)
        -> BackendResult<Vec<Loan>>;

    /// `POST /users/{userName}/loans`
    async fn borrow_book(&self, token: &AccessToken, isbn: &str, user_name: &str)
        -> BackendResult<Loan>;

    /// `DELETE /users/{userName}/loans/{loanId}`
    async fn return_book(&self, token: &AccessToken, loan_id: i64, user_name: &str)
        -> BackendResult<()>;
}

/// reqwest implementation of BackendClient.
pub struct HttpBackendClient {
    http: reqwest::Client,
    base_url: Url,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl HttpBackendClient {
    /// Create a client with the default request chain.
    pub fn new(config: &HttpClientConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::internal(format!("Invalid backend base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::internal("Backend base URL cannot be a base"));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| AppError::internal(format!("HTTP client error: {}", e)))?;

        tracing::debug!("Backend client targeting {}", base_url);
        Ok(Self {
            http,
            base_url,
            interceptors: default_chain(),
        })
    }

    /// Replace the request chain.
    pub fn with_interceptors(mut self, interceptors: Vec<Arc<dyn RequestInterceptor>>) -> Self {
        self.interceptors = interceptors;
        self
    }

    /// Base URL joined with percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http.request(method, self.url(segments))
    }

    /// Run the request chain, then send.
    async fn send(&self, token: &AccessToken, builder: RequestBuilder) -> BackendResult<Response> {
        let mut request = builder.build()?;
        for interceptor in &self.interceptors {
            interceptor.apply(&mut request, token)?;
        }
        Ok(self.http.execute(request).await?)
    }

    async fn search<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        resource: &str,
        query: &SearchQuery,
    ) -> BackendResult<Page<T>> {
        let response = self
            .send(token, self.request(Method::GET, &[resource]).query(&search_params(query)))
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        decode(response).await
    }

    async fn lookup<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        segments: &[&str],
    ) -> BackendResult<Option<T>> {
        let response = self.send(token, self.request(Method::GET, segments)).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => decode(response).await.map(Some),
            _ => Err(status_error(response).await),
        }
    }
}

/// Query parameters for a search; a blank search string is omitted.
fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("size", query.size.to_string()),
        ("sort", query.sort.clone()),
    ];
    if let Some(filter) = query.search_filter() {
        params.push(("searchString", filter.to_string()));
    }
    params
}

async fn decode<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Read the error body, if any, as `(code, message)`.
async fn error_body(response: Response) -> (u16, Option<String>, String) {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("Unexpected backend response")
        .to_string();

    match response.bytes().await {
        Ok(bytes) => match serde_json::from_slice::<ErrorResponse>(&bytes) {
            Ok(body) => (status.as_u16(), Some(body.error.code), body.error.message),
            Err(_) => (status.as_u16(), None, fallback),
        },
        Err(_) => (status.as_u16(), None, fallback),
    }
}

async fn status_error(response: Response) -> BackendError {
    let (status, _, message) = error_body(response).await;
    BackendError::Status { status, message }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn search_books(
        &self,
        token: &AccessToken,
        query: &SearchQuery,
    ) -> BackendResult<Page<Book>> {
        self.search(token, "books", query).await
    }

    async fn get_book_by_isbn(
        &self,
        token: &AccessToken,
        isbn: &str,
    ) -> BackendResult<Option<Book>> {
        self.lookup(token, &["books", isbn]).await
    }

    async fn search_users(
        &self,
        token: &AccessToken,
        query: &SearchQuery,
    ) -> BackendResult<Page<User>> {
        self.search(token, "users", query).await
    }

    async fn get_user(&self, token: &AccessToken, user_name: &str) -> BackendResult<Option<User>> {
        self.lookup(token, &["users", user_name]).await
    }

    async fn get_borrowed_books_of_user(
        &self,
        token: &AccessToken,
        user_name: &str,
    ) -> BackendResult<Vec<Loan>> {
        let loans = self.lookup(token, &["users", user_name, "loans"]).await?;
        Ok(loans.unwrap_or_default())
    }

    async fn borrow_book(
        &self,
        token: &AccessToken,
        isbn: &str,
        user_name: &str,
    ) -> BackendResult<Loan> {
        let body = BorrowRequest {
            isbn: isbn.to_string(),
        };
        let response = self
            .send(
                token,
                self.request(Method::POST, &["users", user_name, "loans"]).json(&body),
            )
            .await?;

        if response.status().is_success() {
            return decode(response).await;
        }

        match error_body(response).await {
            (409, Some(code), message) if code == BOOK_ALREADY_BORROWED => {
                Err(BackendError::AlreadyBorrowed {
                    isbn: isbn.to_string(),
                    message,
                })
            }
            (status, _, message) => Err(BackendError::Status { status, message }),
        }
    }

    async fn return_book(
        &self,
        token: &AccessToken,
        loan_id: i64,
        user_name: &str,
    ) -> BackendResult<()> {
        let loan_id = loan_id.to_string();
        let response = self
            .send(
                token,
                self.request(Method::DELETE, &["users", user_name, "loans", &loan_id]),
            )
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode as HttpStatus;

    #[test]
    fn test_search_params_omit_blank_search_string() {
        let query = SearchQuery::new(Some("  ".to_string()), 2, 20, "author").unwrap();
        let params = search_params(&query);

        assert!(params.iter().all(|(name, _)| *name != "searchString"));
        assert!(params.contains(&("page", "2".to_string())));
        assert!(params.contains(&("sort", "author".to_string())));
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = HttpBackendClient::new(&HttpClientConfig {
            base_url: "http://backend:8081/library/api".to_string(),
            ..HttpClientConfig::default()
        })
        .unwrap();

        let url = client.url(&["users", "a b/c", "loans"]);
        assert_eq!(url.path(), "/library/api/users/a%20b%2Fc/loans");
    }

    #[test]
    fn test_backend_errors_map_to_browser_statuses() {
        let conflict = AppError::from(BackendError::AlreadyBorrowed {
            isbn: "conflict-isbn".to_string(),
            message: "taken".to_string(),
        });
        assert_eq!(conflict.status(), HttpStatus::CONFLICT);

        let not_found = AppError::from(BackendError::Status {
            status: 404,
            message: "Resource not found".to_string(),
        });
        assert_eq!(not_found.status(), HttpStatus::NOT_FOUND);

        let server = AppError::from(BackendError::Status {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(server.status(), HttpStatus::BAD_GATEWAY);

        let decode = AppError::from(BackendError::Decode("eof".to_string()));
        assert_eq!(decode.status(), HttpStatus::BAD_GATEWAY);
    }
}
