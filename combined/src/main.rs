//! Combined binary for development - runs backend and frontend in one process.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "library")]
#[command(about = "Library lending backend and frontend in one binary")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run backend and frontend in a single process (development mode)
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value = "9090")]
        frontend_port: u16,
        #[arg(long, default_value = "8081")]
        backend_port: u16,
    },
    /// Run database migrations for the backend
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            frontend_port,
            backend_port,
        } => {
            info!("Starting library in development mode");
            info!("  Frontend: http://{}:{}", host, frontend_port);
            info!("  Backend:  http://{}:{}", host, backend_port);

            // Spawn the backend first (it owns the database)
            let backend_host = host.clone();
            let backend_handle = tokio::spawn(async move {
                if let Err(e) = library_service_lib::run_embedded(&backend_host, backend_port).await
                {
                    error!("Library service failed: {}", e);
                }
            });

            // Wait a moment for the backend to start
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;

            let frontend_host = host.clone();
            let frontend_handle = tokio::spawn(async move {
                if let Err(e) =
                    library_frontend_lib::run_embedded(&frontend_host, frontend_port, backend_port)
                        .await
                {
                    error!("Frontend failed: {}", e);
                }
            });

            // Wait for either tier to exit (which would indicate an error)
            tokio::select! {
                _ = backend_handle => {
                    error!("Library service exited unexpectedly");
                }
                _ = frontend_handle => {
                    error!("Frontend exited unexpectedly");
                }
            }
        }
        Commands::Migrate { action } => {
            library_service_lib::run_migrations(action).await?;
        }
    }

    Ok(())
}
