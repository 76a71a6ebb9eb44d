use std::path::PathBuf;

/// Seeder configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SeederConfig {
    pub database_url: String,
    /// CSV export to import (default: `movies.csv`).
    pub csv_path: PathBuf,
    /// Rows per `INSERT` statement (default: `500`).
    pub batch_size: usize,
    /// Maximum pooled database connections (default: `20`).
    pub db_max_connections: u32,
}

impl SeederConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default      |
    /// |----------------------|--------------|
    /// | `DATABASE_URL`       | required     |
    /// | `SEED_CSV_PATH`      | `movies.csv` |
    /// | `SEED_BATCH_SIZE`    | `500`        |
    /// | `DB_MAX_CONNECTIONS` | `20`         |
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let csv_path = std::env::var("SEED_CSV_PATH")
            .unwrap_or_else(|_| "movies.csv".into())
            .into();

        let batch_size: usize = std::env::var("SEED_BATCH_SIZE")
            .unwrap_or_else(|_| "500".into())
            .parse()
            .expect("SEED_BATCH_SIZE must be a valid usize");
        assert!(batch_size > 0, "SEED_BATCH_SIZE must be greater than zero");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        Self {
            database_url,
            csv_path,
            batch_size,
            db_max_connections,
        }
    }
}
