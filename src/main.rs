use std::sync::Arc;

use clap::Parser;
use donation_ledger::config::Config;
use donation_ledger::{handlers, Ledger, SqliteState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    if let Err(e) = run(config).await {
        error!(error = %e, "donation ledger stopped");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = SqliteState::open(&config.db_path)?;
    let ledger = Ledger::new(state);
    ledger.bootstrap()?;

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(bind = %config.bind, db = %config.db_path.display(), "listening");
    axum::serve(listener, handlers::router(Arc::new(ledger))).await?;
    Ok(())
}
