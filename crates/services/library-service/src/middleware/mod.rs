//! Middleware for authentication.

mod auth;

pub use auth::{auth_middleware, require_librarian, require_librarian_or_self, CurrentUser};
