//! Library Service - HTTP API for books, users and loans.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_service_lib::{MigrateAction, ServeOptions};

#[derive(Parser)]
#[command(name = "library-service")]
#[command(about = "Library lending backend API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations, then start the HTTP server
    Serve {
        /// Defaults to LIBRARY_SERVICE_HOST
        #[arg(long)]
        host: Option<String>,
        /// Defaults to LIBRARY_SERVICE_PORT
        #[arg(long)]
        port: Option<u16>,
        /// Serve the current schema without migrating it
        #[arg(long)]
        skip_migrations: bool,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Print the OpenAPI document and exit
    Openapi,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Keep stdout clean for `openapi`
    if let Commands::Openapi = cli.command {
        println!("{}", library_service_lib::openapi_json()?);
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            skip_migrations,
        } => {
            library_service_lib::run(ServeOptions {
                host,
                port,
                skip_migrations,
            })
            .await?
        }
        Commands::Migrate { action } => library_service_lib::run_migrations(action).await?,
        Commands::Openapi => {}
    }

    Ok(())
}
