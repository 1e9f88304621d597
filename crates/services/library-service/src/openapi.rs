//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use domain::{Book, BookPage, Loan, User, UserPage};

use crate::handlers::user_handler::BorrowBody;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::book_handler::search_books,
        crate::handlers::book_handler::get_book,
        crate::handlers::user_handler::search_users,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::list_loans,
        crate::handlers::user_handler::borrow_book,
        crate::handlers::user_handler::return_book,
    ),
    components(
        schemas(
            Book,
            User,
            Loan,
            BorrowBody,
            BookPage,
            UserPage,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Books", description = "Catalog search and lookup"),
        (name = "Users", description = "Library members"),
        (name = "Loans", description = "Borrowing and returning books"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
