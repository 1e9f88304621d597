//! Integration tests for the library API endpoints.
//!
//! These tests use in-memory services to exercise routing, bearer token
//! validation and authorization without requiring a database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{AppError, AppResult, JwtConfig};
use domain::{
    AccessClaims, Book, BookSort, Loan, Page, RealmAccess, SearchQuery, User, UserSort,
    BOOK_ALREADY_BORROWED, ROLE_LIBRARIAN,
};
use library_service_lib::infra::ReadinessCheck;
use library_service_lib::routes::create_router;
use library_service_lib::service::{CatalogService, LendingService, TokenValidator, UserService};
use library_service_lib::state::AppState;

const SECRET: &str = "test-secret-key-for-testing-only-32chars";

// =============================================================================
// In-memory services
// =============================================================================

fn book(isbn: &str, title: &str) -> Book {
    Book {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author: "Test Author".to_string(),
        publisher: None,
        published_year: None,
        available: true,
    }
}

fn user(user_name: &str) -> User {
    User {
        user_name: user_name.to_string(),
        first_name: "Test".to_string(),
        last_name: user_name.to_string(),
        email: format!("{}@example.com", user_name),
    }
}

struct InMemoryCatalog {
    books: Vec<Book>,
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn search_books(&self, query: SearchQuery) -> AppResult<Page<Book>> {
        let _sort: BookSort = query.sort.parse()?;
        let matching: Vec<Book> = self
            .books
            .iter()
            .filter(|b| query.search_filter().map_or(true, |f| b.title.contains(f)))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let content = matching
            .into_iter()
            .skip(query.offset() as usize)
            .collect();
        Ok(Page::new(content, query.page, query.size, total))
    }

    async fn get_book(&self, isbn: &str) -> AppResult<Book> {
        self.books
            .iter()
            .find(|b| b.isbn == isbn)
            .cloned()
            .ok_or(AppError::NotFound)
    }
}

struct InMemoryUsers;

#[async_trait]
impl UserService for InMemoryUsers {
    async fn search_users(&self, query: SearchQuery) -> AppResult<Page<User>> {
        let _sort: UserSort = query.sort.parse()?;
        let users = vec![user("demo_user_1"), user("demo_user_2")];
        Ok(Page::new(users, query.page, query.size, 2))
    }

    async fn get_user(&self, user_name: &str) -> AppResult<User> {
        match user_name {
            "demo_user_1" | "demo_user_2" => Ok(user(user_name)),
            _ => Err(AppError::NotFound),
        }
    }
}

#[derive(Default)]
struct InMemoryLending {
    loans: Mutex<Vec<Loan>>,
}

#[async_trait]
impl LendingService for InMemoryLending {
    async fn loans_of(&self, user_name: &str) -> AppResult<Vec<Loan>> {
        let loans = self.loans.lock().unwrap();
        Ok(loans
            .iter()
            .filter(|l| l.user_name == user_name)
            .cloned()
            .collect())
    }

    async fn borrow_book(&self, user_name: &str, isbn: &str) -> AppResult<Loan> {
        let mut loans = self.loans.lock().unwrap();
        if loans.iter().any(|l| l.book.isbn == isbn) {
            return Err(AppError::BookAlreadyBorrowed(isbn.to_string()));
        }
        let loan = Loan {
            loan_id: loans.len() as i64 + 1,
            user_name: user_name.to_string(),
            book: Book {
                available: false,
                ..book(isbn, "Borrowed")
            },
            borrowed_at: Utc::now(),
        };
        loans.push(loan.clone());
        Ok(loan)
    }

    async fn return_book(&self, user_name: &str, loan_id: i64) -> AppResult<()> {
        let mut loans = self.loans.lock().unwrap();
        let position = loans
            .iter()
            .position(|l| l.loan_id == loan_id && l.user_name == user_name)
            .ok_or(AppError::NotFound)?;
        loans.remove(position);
        Ok(())
    }
}

struct AlwaysHealthy;

#[async_trait]
impl ReadinessCheck for AlwaysHealthy {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app() -> Router {
    let validator = TokenValidator::new(&JwtConfig {
        secret: SECRET.to_string(),
        ..JwtConfig::default()
    })
    .unwrap();

    let state = AppState::new(
        Arc::new(InMemoryCatalog {
            books: vec![
                book("978-0451524935", "1984"),
                book("978-0547928227", "The Hobbit"),
            ],
        }),
        Arc::new(InMemoryUsers),
        Arc::new(InMemoryLending::default()),
        Arc::new(validator),
        Arc::new(AlwaysHealthy),
    );

    create_router(state)
}

fn token_for(user_name: &str, roles: &[&str]) -> String {
    let claims = AccessClaims {
        sub: format!("sub-{}", user_name),
        preferred_username: Some(user_name.to_string()),
        name: None,
        given_name: None,
        family_name: None,
        email: None,
        realm_access: Some(RealmAccess {
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }),
        exp: Utc::now().timestamp() + 300,
        iat: Some(Utc::now().timestamp()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health_requires_no_token() {
    let (status, body) = send(&app(), request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_carries_schema_examples() {
    let (status, body) =
        send(&app(), request("GET", "/api-docs/openapi.json", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    let book = &body["components"]["schemas"]["Book"]["properties"];
    assert_eq!(book["isbn"]["example"], "978-0743273565");
    assert_eq!(book["title"]["example"], "The Great Gatsby");
    assert!(body["paths"]["/library/api/books"].is_object());

    let printed = library_service_lib::openapi_json().unwrap();
    let printed: Value = serde_json::from_str(&printed).unwrap();
    assert_eq!(printed, body);
}

#[tokio::test]
async fn test_books_require_token() {
    let (status, body) = send(&app(), request("GET", "/library/api/books", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let (status, _) = send(
        &app(),
        request("GET", "/library/api/books", Some("not-a-jwt"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_search_books_returns_page() {
    let token = token_for("demo_user_1", &[]);
    let (status, body) = send(
        &app(),
        request("GET", "/library/api/books?page=0&size=1&sort=title", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"].as_array().unwrap().len(), 1);
    assert_eq!(body["totalElements"], 2);
    assert_eq!(body["totalPages"], 2);
}

#[tokio::test]
async fn test_search_books_rejects_bad_size_and_sort() {
    let app = app();
    let token = token_for("demo_user_1", &[]);

    let (status, _) = send(
        &app,
        request("GET", "/library/api/books?size=0", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        request("GET", "/library/api/books?sort=password", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_search_books_rejects_page_beyond_offset_range() {
    let app = app();
    let token = token_for("demo_user_1", &[]);
    let uri = format!("/library/api/books?page={}&size=10", u64::MAX / 2);

    let (status, body) = send(&app, request("GET", &uri, Some(&token), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_book_not_found() {
    let token = token_for("demo_user_1", &[]);
    let (status, _) = send(
        &app(),
        request("GET", "/library/api/books/missing", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_users_is_librarian_only() {
    let app = app();

    let member = token_for("demo_user_1", &[]);
    let (status, _) = send(&app, request("GET", "/library/api/users", Some(&member), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let librarian = token_for("librarian", &[ROLE_LIBRARIAN]);
    let (status, body) =
        send(&app, request("GET", "/library/api/users", Some(&librarian), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"][0]["userName"], "demo_user_1");
}

#[tokio::test]
async fn test_get_other_user_forbidden_for_members() {
    let token = token_for("demo_user_1", &[]);
    let (status, _) = send(
        &app(),
        request("GET", "/library/api/users/demo_user_2", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_borrow_then_conflict_then_return() {
    let app = app();
    let token = token_for("demo_user_1", &[]);
    let borrow = || {
        request(
            "POST",
            "/library/api/users/demo_user_1/loans",
            Some(&token),
            Some(json!({ "isbn": "978-0451524935" })),
        )
    };

    let (status, loan) = send(&app, borrow()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(loan["book"]["isbn"], "978-0451524935");
    assert_eq!(loan["book"]["available"], false);

    let (status, body) = send(&app, borrow()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], BOOK_ALREADY_BORROWED);

    let (status, loans) = send(
        &app,
        request("GET", "/library/api/users/demo_user_1/loans", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loans.as_array().unwrap().len(), 1);

    let uri = format!("/library/api/users/demo_user_1/loans/{}", loan["loanId"]);
    let (status, _) = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_return_of_other_users_loan_is_not_found() {
    let app = app();
    let owner = token_for("demo_user_2", &[]);
    let (_, loan) = send(
        &app,
        request(
            "POST",
            "/library/api/users/demo_user_2/loans",
            Some(&owner),
            Some(json!({ "isbn": "978-0547928227" })),
        ),
    )
    .await;

    let intruder = token_for("demo_user_1", &[]);
    let uri = format!("/library/api/users/demo_user_1/loans/{}", loan["loanId"]);
    let (status, _) = send(&app, request("DELETE", &uri, Some(&intruder), None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_borrow_with_blank_isbn_is_bad_request() {
    let token = token_for("demo_user_1", &[]);
    let (status, _) = send(
        &app(),
        request(
            "POST",
            "/library/api/users/demo_user_1/loans",
            Some(&token),
            Some(json!({ "isbn": "  " })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_borrow_body_gets_error_body() {
    let app = app();
    let token = token_for("demo_user_1", &[]);

    let raw = Request::builder()
        .method("POST")
        .uri("/library/api/users/demo_user_1/loans")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"isbn\":"))
        .unwrap();
    let (status, body) = send(&app, raw).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/library/api/users/demo_user_1/loans",
            Some(&token),
            Some(json!({ "book": "978-0451524935" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/library/api/users/demo_user_1/loans",
            Some(&token),
            Some(json!({ "isbn": "" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "isbn is required");
}
