// Main entry point for the harvest worker

use anyhow::{Context, Result};
use harvester_core::{Config, GraphFeedClient, Harvester, PostgresHarvestStore, RunOutcome};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,harvester_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let store = PostgresHarvestStore::with_lease_seconds(pool, config.lease_seconds);
    let fetcher = GraphFeedClient::new(
        config.graph_endpoint.clone(),
        config.doc_id.clone(),
        config.page_size,
    );
    let harvester = Harvester::new(store, fetcher, config.lease_seconds);

    match harvester
        .run_once()
        .await
        .context("harvest pass failed")?
    {
        RunOutcome::NoWorkAvailable => {
            tracing::info!("nothing to do, exiting");
        }
        RunOutcome::CompletedPage { source_id, store } => {
            tracing::info!(
                source_id,
                inserted = store.inserted,
                duplicates = store.duplicates,
                skipped = store.skipped,
                "page complete, exiting"
            );
        }
    }

    Ok(())
}
