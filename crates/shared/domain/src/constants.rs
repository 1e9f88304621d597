//! Domain-level constants.
//!
//! These constants define business rules and the shared wire contract.

// =============================================================================
// Roles
// =============================================================================

/// Role granting access to the administrative user views
pub const ROLE_LIBRARIAN: &str = "LIBRARIAN";

// =============================================================================
// Pagination & Sorting
// =============================================================================

/// Default zero-based page index
pub const DEFAULT_PAGE: u64 = 0;

/// Default number of elements per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Upper bound on elements per page
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default sort key for book searches
pub const DEFAULT_BOOK_SORT: &str = "title";

/// Default sort key for user searches
pub const DEFAULT_USER_SORT: &str = "firstName";

// =============================================================================
// HTTP Contract
// =============================================================================

/// Base path of the backend JSON API
pub const API_BASE_PATH: &str = "/library/api";

/// Base path of the browser-facing views
pub const UI_BASE_PATH: &str = "/library/ui";

/// Error code carried in the body of a 409 when a book is already on loan
pub const BOOK_ALREADY_BORROWED: &str = "BOOK_ALREADY_BORROWED";

/// Header carrying the anti-forgery token on state-changing requests
pub const CSRF_HEADER_NAME: &str = "X-CSRF-TOKEN";

/// Form/query parameter carrying the anti-forgery token
pub const CSRF_PARAM_NAME: &str = "_csrf";

// =============================================================================
// Authentication
// =============================================================================

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
