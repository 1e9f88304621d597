//! SeaORM entities.

pub mod book;
pub mod loan;
pub mod user;
