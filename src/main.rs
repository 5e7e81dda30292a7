use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roomledger::{api, config::Config};

#[derive(Parser)]
#[command(name = "roomledger")]
#[command(about = "Rooms, guests, rental contracts and payments for small properties")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Path to the SQLite database
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Apply pending database migrations and exit
    Migrate {
        /// Path to the SQLite database
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "roomledger=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting roomledger server on {}", config.bind_addr());

    let db = config.open_database()?;
    db.migrate()?;

    let app = api::create_router_with_config(db, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    tracing::info!(
        "roomledger server listening on http://{}",
        config.bind_addr()
    );

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env();

    match cli.command {
        Some(Commands::Serve { port, host, db }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            if db.is_some() {
                config.db_path = db;
            }
            serve(config).await?;
        }
        Some(Commands::Migrate { db }) => {
            if db.is_some() {
                config.db_path = db;
            }
            let db = config.open_database()?;
            db.migrate()?;
            tracing::info!("Database is up to date");
        }
        None => serve(config).await?,
    }

    Ok(())
}
