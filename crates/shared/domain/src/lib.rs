//! Domain layer - Core library entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Types here are the wire contract shared by the backend API and the frontend.

pub mod book;
pub mod constants;
pub mod error;
pub mod identity;
pub mod loan;
pub mod page;
pub mod user;

pub use book::Book;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use identity::{has_role, AccessClaims, Identity, RealmAccess};
pub use loan::{BorrowRequest, Loan};
pub use page::{BookSort, Page, SearchQuery, UserSort};
#[cfg(feature = "openapi")]
pub use page::{BookPage, UserPage};
pub use user::{User, UserWithLoans};
