use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sowgate::{api, seed};
use sowgate_core::db::Database;

#[derive(Parser)]
#[command(name = "sowgate")]
#[command(about = "Statement-of-Work approval workflow server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Sowgate server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Database file (defaults to the platform data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Seed the demo users, signature limits, vendor and sample SOW
    Seed {
        /// Database file (defaults to the platform data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<Database> {
    let db = match path {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "sowgate=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, db }) => {
            serve(open_database(db)?, port).await?;
        }
        Some(Commands::Seed { db }) => {
            seed::run(&open_database(db)?)?;
        }
        None => {
            // Default: start server on port 3000
            serve(open_database(None)?, 3000).await?;
        }
    }

    Ok(())
}

async fn serve(db: Database, port: u16) -> anyhow::Result<()> {
    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Sowgate server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
