//! Per-operation connection handling for a single database file.
//!
//! # Responsibility
//! - Remember where the database lives, never hold a connection open.
//! - Configure every fresh connection the same way.
//!
//! # Invariants
//! - Returned connections have `busy_timeout` set so concurrent writers wait
//!   instead of failing immediately.

use super::schema::TableSchema;
use super::DbResult;
use log::{debug, error};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to one SQLite database file.
///
/// Cheap to clone; every clone points at the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Records the database location, creating its parent directory.
    ///
    /// The file itself is created lazily by the first `connect`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a fresh connection for one logical operation.
    ///
    /// # Side effects
    /// - Emits `db_open` logging events with duration and status.
    pub fn connect(&self) -> DbResult<Connection> {
        let started_at = Instant::now();

        let conn = match Connection::open(&self.path) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error duration_ms={} error_code=db_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        if let Err(err) = conn.busy_timeout(BUSY_TIMEOUT) {
            error!(
                "event=db_open module=db status=error duration_ms={} error_code=db_configure_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }

        debug!(
            "event=db_open module=db status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(conn)
    }

    /// Creates the given table when it does not exist yet.
    pub fn ensure_table(&self, schema: &TableSchema) -> DbResult<()> {
        let conn = self.connect()?;
        conn.execute_batch(schema.create_sql)?;
        debug!(
            "event=table_ready module=db status=ok table={}",
            schema.table
        );
        Ok(())
    }
}
