//! Middleware components.

pub mod csrf;
mod librarian;
mod logging;
pub mod session;

pub use csrf::csrf_middleware;
pub use librarian::{require_librarian, ACCESS_DENIED_PATH};
pub use logging::log_request;
pub use session::{load_session, session_middleware, REFRESH_SKEW_SECONDS};
