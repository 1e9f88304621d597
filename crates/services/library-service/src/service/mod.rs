//! Service layer - business logic.

mod catalog_service;
mod lending_service;
mod token_validator;
mod user_service;

pub use catalog_service::{Catalog, CatalogService};
pub use lending_service::{LendingManager, LendingService};
pub use token_validator::TokenValidator;
pub use user_service::{UserManager, UserService};
