// SQLite Connection Pool Setup

use carcare_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Create SQLite connection pool with WAL mode
///
/// In-memory databases get a single connection: every new connection
/// to `sqlite::memory:` would otherwise see its own empty database.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::StoreUnavailable(format!("invalid database url: {}", e)))?
        .busy_timeout(Duration::from_secs(5))
        .create_if_missing(true);
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let max_connections = if in_memory { 1 } else { 5 };
    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        // Dropping the only connection would drop the database with it
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }
    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;

    debug!(database_url, max_connections, "SQLite pool ready");
    Ok(pool)
}

/// Build a `sqlite://` URL for a file path
pub fn database_url(path: &std::path::Path) -> String {
    format!("sqlite://{}", path.display())
}
