// sqlx::Error -> port error mapping
// No sqlx type crosses the port boundary.

use carcare_core::port::{LoadError, SaveError};

/// SQLite result codes we distinguish (https://www.sqlite.org/rescode.html)
const SQLITE_BUSY: &str = "5";
const SQLITE_FULL: &str = "13";
const SQLITE_CANTOPEN: &str = "14";
const SQLITE_NOTADB: &str = "26";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_NOTNULL: &str = "1299";

fn db_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

pub(crate) fn map_load_error(err: sqlx::Error) -> LoadError {
    match db_code(&err).as_deref() {
        Some(SQLITE_CANTOPEN) | Some(SQLITE_BUSY) => LoadError::StoreOpenFailed(err.to_string()),
        Some(SQLITE_NOTADB) => LoadError::SchemaIncompatible(err.to_string()),
        _ => match &err {
            sqlx::Error::ColumnNotFound(col) => {
                LoadError::SchemaIncompatible(format!("missing column {}", col))
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                LoadError::ValidationFailed(err.to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                LoadError::StoreOpenFailed(err.to_string())
            }
            _ => LoadError::Unknown(err.to_string()),
        },
    }
}

pub(crate) fn map_save_error(err: sqlx::Error) -> SaveError {
    match db_code(&err).as_deref() {
        Some(SQLITE_CONSTRAINT_UNIQUE)
        | Some(SQLITE_CONSTRAINT_PRIMARYKEY)
        | Some(SQLITE_CONSTRAINT_NOTNULL) => SaveError::ValidationFailed(err.to_string()),
        Some(SQLITE_BUSY) | Some(SQLITE_FULL) | Some(SQLITE_CANTOPEN) => {
            SaveError::SaveFailed(err.to_string())
        }
        Some(code) => SaveError::SaveFailed(format!("[{}] {}", code, err)),
        None => match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                SaveError::SaveFailed(err.to_string())
            }
            _ => SaveError::Unknown(err.to_string()),
        },
    }
}
