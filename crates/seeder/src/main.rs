//! One-shot dataset import.
//!
//! Applies migrations, then loads the CSV export into an empty `movies`
//! table. A table that already holds data is left untouched.

mod config;
mod csv_import;

use std::fs::File;
use std::io::BufReader;

use anyhow::Context;
use reel_db::repositories::MovieRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::SeederConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_seeder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SeederConfig::from_env();

    let pool = reel_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Migrating database");
    reel_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let existing = MovieRepo::count_all(&pool).await?;
    if existing > 0 {
        tracing::info!(existing, "Database seeding skipped, data was detected");
        return Ok(());
    }

    tracing::info!(path = %config.csv_path.display(), "Seeding database");
    let file = File::open(&config.csv_path)
        .with_context(|| format!("{} not found", config.csv_path.display()))?;
    let batch = csv_import::read_movies(BufReader::new(file));

    if batch.without_genre > 0 {
        tracing::warn!(
            count = batch.without_genre,
            "Imported movies with no recognised genre"
        );
    }

    let mut tx = pool.begin().await?;
    let mut imported = 0u64;
    for chunk in batch.movies.chunks(config.batch_size) {
        imported += MovieRepo::insert_batch(&mut *tx, chunk)
            .await
            .context("Failed to insert movie batch")?;
        tracing::debug!(imported, "Inserted movie batch");
    }
    tx.commit().await?;

    tracing::info!(
        imported,
        skipped = batch.skipped,
        "Migrated records into the database"
    );
    pool.close().await;
    Ok(())
}
