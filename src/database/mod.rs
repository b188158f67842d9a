use std::str::FromStr;

use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use crate::{config::AppConfig, error::AppError};

/// Opens the single-file store, creating it if needed.
///
/// Foreign-key enforcement is left off: schedules reference their placeholder
/// owner whether or not that user has registered yet.
pub async fn connect(config: &AppConfig) -> Result<Pool<Sqlite>, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(false);

    info!(database_url = %config.database_url, "Connecting to SQLite database");
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations completed successfully");
    Ok(())
}

/// In-memory store for tests. A single connection that never expires, since
/// every new SQLite memory connection would start from an empty database.
#[cfg(test)]
pub async fn connect_in_memory() -> Result<Pool<Sqlite>, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}
