//! Infrastructure layer - database and migrations.

mod db;
pub mod migrations;

pub use db::{Database, ReadinessCheck};
pub use migrations::Migrator;
