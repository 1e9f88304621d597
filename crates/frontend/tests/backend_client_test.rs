//! HTTP-level tests for the backend client against a mock library API.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::HttpClientConfig;
use domain::{Book, Loan, Page, SearchQuery, User, BOOK_ALREADY_BORROWED};
use library_frontend_lib::clients::{AccessToken, BackendClient, BackendError, HttpBackendClient};
use library_frontend_lib::service::LibraryService;

fn book(isbn: &str) -> Book {
    Book {
        isbn: isbn.to_string(),
        title: "1984".to_string(),
        author: "George Orwell".to_string(),
        publisher: Some("Secker & Warburg".to_string()),
        published_year: Some(1949),
        available: true,
    }
}

async fn client(server: &MockServer) -> HttpBackendClient {
    HttpBackendClient::new(&HttpClientConfig {
        base_url: format!("{}/library/api", server.uri()),
        ..HttpClientConfig::default()
    })
    .unwrap()
}

fn token() -> AccessToken {
    AccessToken::new("user-token")
}

fn error_body(code: &str, message: &str) -> serde_json::Value {
    json!({ "error": { "code": code, "message": message } })
}

#[tokio::test]
async fn test_search_books_relays_bearer_token() {
    let server = MockServer::start().await;
    let page = Page::new(vec![book("978-0451524935")], 0, 10, 1);

    Mock::given(method("GET"))
        .and(path("/library/api/books"))
        .and(header("authorization", "Bearer user-token"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .and(query_param("sort", "title"))
        .and(query_param("searchString", "orwell"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::new(Some("orwell".to_string()), 0, 10, "title").unwrap();
    let result = client(&server).await.search_books(&token(), &query).await.unwrap();

    assert_eq!(result, page);
}

#[tokio::test]
async fn test_blank_search_string_is_omitted() {
    let server = MockServer::start().await;
    let page: Page<User> = Page::new(Vec::new(), 0, 10, 0);

    Mock::given(method("GET"))
        .and(path("/library/api/users"))
        .and(query_param_is_missing("searchString"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::new(Some(String::new()), 0, 10, "firstName").unwrap();
    let result = client(&server).await.search_users(&token(), &query).await.unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_search_server_error_is_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/library/api/books"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(error_body("INTERNAL_ERROR", "oops")),
        )
        .mount(&server)
        .await;

    let result = client(&server)
        .await
        .search_books(&token(), &SearchQuery::default())
        .await;

    assert!(matches!(
        result,
        Err(BackendError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_missing_book_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/library/api/books/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(error_body("NOT_FOUND", "Resource not found")),
        )
        .mount(&server)
        .await;

    let result = client(&server)
        .await
        .get_book_by_isbn(&token(), "missing")
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_book_lookup_is_repeatable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/library/api/books/978-0451524935"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book("978-0451524935")))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let first = client.get_book_by_isbn(&token(), "978-0451524935").await.unwrap();
    let second = client.get_book_by_isbn(&token(), "978-0451524935").await.unwrap();

    assert_eq!(first, Some(book("978-0451524935")));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_user_without_loans_keeps_user_in_aggregate() {
    let server = MockServer::start().await;
    let user = User {
        user_name: "demo_user_2".to_string(),
        first_name: "Bob".to_string(),
        last_name: "Smith".to_string(),
        email: "bob.smith@example.com".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/library/api/users/demo_user_2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/library/api/users/demo_user_2/loans"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let service = LibraryService::new(Arc::new(client(&server).await));
    let result = service
        .get_user_with_loans(&token(), "demo_user_2")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.user, user);
    assert!(result.loans.is_empty());
}

#[tokio::test]
async fn test_loans_of_unknown_user_are_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/library/api/users/ghost/loans"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let loans = client(&server)
        .await
        .get_borrowed_books_of_user(&token(), "ghost")
        .await
        .unwrap();

    assert!(loans.is_empty());
}

#[tokio::test]
async fn test_borrow_posts_isbn_and_returns_loan() {
    let server = MockServer::start().await;
    let loan = Loan {
        loan_id: 1,
        user_name: "demo_user_1".to_string(),
        book: Book {
            available: false,
            ..book("978-0451524935")
        },
        borrowed_at: Utc::now(),
    };

    Mock::given(method("POST"))
        .and(path("/library/api/users/demo_user_1/loans"))
        .and(body_json(json!({ "isbn": "978-0451524935" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&loan))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .await
        .borrow_book(&token(), "978-0451524935", "demo_user_1")
        .await
        .unwrap();

    assert_eq!(result, loan);
}

#[tokio::test]
async fn test_borrow_conflict_with_marker_is_already_borrowed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/library/api/users/demo_user_1/loans"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(error_body(BOOK_ALREADY_BORROWED, "Book is already borrowed")),
        )
        .mount(&server)
        .await;

    let result = client(&server)
        .await
        .borrow_book(&token(), "978-0451524935", "demo_user_1")
        .await;

    match result {
        Err(BackendError::AlreadyBorrowed { isbn, .. }) => assert_eq!(isbn, "978-0451524935"),
        other => panic!("expected AlreadyBorrowed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_borrow_conflict_without_marker_is_generic() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/library/api/users/demo_user_1/loans"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(error_body("CONFLICT", "Something else")),
        )
        .mount(&server)
        .await;

    let result = client(&server)
        .await
        .borrow_book(&token(), "978-0451524935", "demo_user_1")
        .await;

    assert!(matches!(
        result,
        Err(BackendError::Status { status: 409, .. })
    ));
}

#[tokio::test]
async fn test_return_book_uses_delete() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/library/api/users/demo_user_1/loans/42"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .await
        .return_book(&token(), 42, "demo_user_1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_return_unknown_loan_is_status() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/library/api/users/demo_user_1/loans/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client(&server)
        .await
        .return_book(&token(), 99, "demo_user_1")
        .await;

    assert!(matches!(
        result,
        Err(BackendError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let client = HttpBackendClient::new(&HttpClientConfig {
        base_url: "http://127.0.0.1:1/library/api".to_string(),
        connect_timeout_ms: 200,
        request_timeout_ms: 500,
    })
    .unwrap();

    let result = client.get_user(&token(), "demo_user_1").await;

    assert!(matches!(result, Err(BackendError::Transport(_))));
}
