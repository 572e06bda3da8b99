//! JCMap Server — application entry point.
//!
//! Initializes tracing, connects to the database with the env-driven
//! configuration, and applies pending migrations. The HTTP surface is
//! mounted by the deployment layer on top of this core.

use jcmap_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jcmap=info")),
        )
        .json()
        .init();

    tracing::info!("Starting JCMap server...");

    let config = DbConfig::from_env();
    if let Err(e) = DbManager::connect_and_migrate(&config).await {
        tracing::error!(error = %e, "database startup failed");
        std::process::exit(1);
    }

    tracing::info!("JCMap core ready.");
}
