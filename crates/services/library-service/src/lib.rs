//! Library Service Library
//!
//! This crate provides the library backend API (books, users, loans) over HTTP.
//! It can be run as a standalone service or embedded in the combined binary.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod infra;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;

use crate::config::LibraryServiceConfig;
use crate::infra::Database;
use crate::openapi::ApiDoc;
use crate::repository::{BookStore, LoanStore, UserStore};
use crate::routes::create_router;
use crate::service::{Catalog, LendingManager, TokenValidator, UserManager};
use crate::state::AppState;

/// Startup options of the standalone binary.
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    /// Overrides `LIBRARY_SERVICE_HOST`
    pub host: Option<String>,
    /// Overrides `LIBRARY_SERVICE_PORT`
    pub port: Option<u16>,
    /// Start against the schema as it is, without applying pending migrations
    pub skip_migrations: bool,
}

/// Run the library service standalone.
pub async fn run(options: ServeOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = LibraryServiceConfig::from_env();
    let host = options.host.unwrap_or_else(|| config.host.clone());
    let port = options.port.unwrap_or(config.port);
    run_server_with_config(&host, port, config, !options.skip_migrations).await
}

/// Run the library service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = LibraryServiceConfig::from_env();
    run_server_with_config(host, port, config, true).await
}

/// The OpenAPI document served at `/api-docs/openapi.json`, pretty-printed.
pub fn openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = LibraryServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action, usable directly as a clap subcommand.
#[derive(Debug, Clone, Copy, clap::Subcommand)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: LibraryServiceConfig,
    migrate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let token_validator = Arc::new(TokenValidator::new(&config.jwt)?);

    let db = if migrate {
        Database::connect(&config.database).await?
    } else {
        info!("Skipping migrations");
        Database::connect_without_migrations(&config.database).await?
    };
    let db_conn = db.get_connection();

    // Create repositories and services
    let user_repo = Arc::new(UserStore::new(db_conn.clone()));
    let book_repo = Arc::new(BookStore::new(db_conn.clone()));
    let loan_repo = Arc::new(LoanStore::new(db_conn));

    let catalog = Arc::new(Catalog::new(book_repo.clone()));
    let users = Arc::new(UserManager::new(user_repo.clone()));
    let lending = Arc::new(LendingManager::new(user_repo, book_repo, loan_repo));

    let state = AppState::new(catalog, users, lending, token_validator, Arc::new(db));

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Library service listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
