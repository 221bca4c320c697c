//! SQLite storage bootstrap and table schema entry points.
//!
//! # Responsibility
//! - Locate the database file and open one connection per logical operation.
//! - Create per-kind tables on demand.
//!
//! # Invariants
//! - No connection outlives the operation that opened it.
//! - Tables are created with `IF NOT EXISTS`; existing rows are never touched.
//!
//! # See also
//! - `repo::record_repo` for the row-level contracts.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod schema;
mod store;

pub use schema::TableSchema;
pub use store::Store;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "database path error: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
