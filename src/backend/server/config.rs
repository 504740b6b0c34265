/**
 * Server Configuration
 *
 * This module selects the durable store the server runs on.
 *
 * # Store Selection
 *
 * - `DATABASE_URL` set: PostgreSQL, with migrations applied
 * - `DATABASE_URL` unset: the in-memory store, with a warning (data is lost
 *   on exit)
 *
 * # Error Handling
 *
 * A configured database that cannot be reached or migrated stops startup.
 * The server never swaps a configured database for the in-memory store.
 */

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::backend::store::{ChatStore, MemoryChatStore, PgChatStore};
use crate::shared::config::ChatConfig;

/// How long startup waits for the first database connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Why the server could not start
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to run database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Load and initialize database connection pool
///
/// This function:
/// 1. Creates a PostgreSQL connection pool for `database_url`
/// 2. Runs database migrations
///
/// # Returns
///
/// The migrated pool, or the step that failed
pub async fn load_database(database_url: &str) -> Result<PgPool, StartupError> {
    tracing::info!("[Config] Connecting to database...");

    let pool = PgPoolOptions::new()
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect(database_url)
        .await
        .map_err(|e| {
            tracing::error!("[Config] Failed to create database connection pool: {:?}", e);
            StartupError::Connect(e)
        })?;

    tracing::info!("[Config] Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("[Config] Failed to run database migrations: {}", e);
        StartupError::from(e)
    })?;
    tracing::info!("[Config] Database migrations completed successfully");

    Ok(pool)
}

/// Pick the store for this configuration
pub async fn load_store(config: &ChatConfig) -> Result<Arc<dyn ChatStore>, StartupError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let pool = load_database(url).await?;
            tracing::info!("[Config] Using PostgreSQL chat store");
            Ok(Arc::new(PgChatStore::new(pool)))
        }
        None => {
            tracing::warn!(
                "[Config] DATABASE_URL not set, using in-memory chat store; messages will not survive a restart"
            );
            Ok(Arc::new(MemoryChatStore::new()))
        }
    }
}
