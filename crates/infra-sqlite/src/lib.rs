// CarCare Infrastructure - SQLite Adapter
// Implements: RecordStore

mod connection;
mod error;
mod migration;
mod record_store;

pub use connection::{create_pool, database_url};
pub use migration::{run_migrations, LATEST_SCHEMA_VERSION};
pub use record_store::SqliteRecordStore;

// Note: sqlx::Error is mapped onto LoadError / SaveError in `error`
// (orphan rules: no From<sqlx::Error> for core types here)
