//! Generic record table with minimum-available-ID allocation.
//!
//! # Responsibility
//! - Provide create/list/get/delete over any `Record` kind.
//! - Assign IDs: the smallest positive integer not used in the table.
//!
//! # Invariants
//! - Write paths validate drafts before opening a connection.
//! - ID selection and insert run inside one IMMEDIATE transaction, so two
//!   writers on the same file cannot pick the same ID.
//! - Deleting a missing ID is not an error.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{DbError, Store, TableSchema};
use crate::model::validation::ValidationError;
use crate::model::RecordId;
use log::{debug, info};
use rusqlite::{Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// A record kind stored in its own table with an integer primary key.
pub trait Record: Sized {
    /// Caller-supplied fields for a new row.
    type Draft;

    const SCHEMA: TableSchema;
    /// `SELECT <columns> FROM <table>` without trailing clauses.
    const SELECT_SQL: &'static str;

    fn validate_draft(draft: &Self::Draft) -> Result<(), ValidationError>;
    fn insert(conn: &Connection, id: RecordId, draft: &Self::Draft) -> rusqlite::Result<()>;
    /// Builds the in-memory value matching a row just inserted from `draft`.
    fn from_draft(id: RecordId, draft: &Self::Draft) -> Self;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// Returns the smallest integer `>= 1` not present in `table.id`.
///
/// Walks the ascending key list once and stops at the first gap.
pub fn next_available_id(conn: &Connection, table: &str) -> RepoResult<RecordId> {
    let mut stmt = conn.prepare(&format!("SELECT id FROM {table} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut candidate: RecordId = 1;
    while let Some(row) = rows.next()? {
        let id: RecordId = row.get(0)?;
        if id > candidate {
            break;
        }
        if id == candidate {
            candidate += 1;
        }
    }
    Ok(candidate)
}

/// SQLite-backed table for one record kind.
///
/// Holds no connection; each call opens its own.
pub struct RecordTable<R: Record> {
    store: Store,
    _kind: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for RecordTable<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _kind: PhantomData,
        }
    }
}

impl<R: Record> RecordTable<R> {
    /// Binds to `store`, creating the table when absent.
    pub fn open(store: Store) -> RepoResult<Self> {
        store.ensure_table(&R::SCHEMA)?;
        Ok(Self {
            store,
            _kind: PhantomData,
        })
    }

    /// Validates `draft`, assigns the minimum available ID and inserts it.
    pub fn create(&self, draft: &R::Draft) -> RepoResult<R> {
        R::validate_draft(draft)?;

        let mut conn = self.store.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let id = next_available_id(&tx, R::SCHEMA.table)?;
        R::insert(&tx, id, draft)?;
        tx.commit()?;

        info!(
            "event=record_create module=repo status=ok table={} id={}",
            R::SCHEMA.table,
            id
        );
        Ok(R::from_draft(id, draft))
    }

    /// Hard-deletes one row. Returns whether a row was removed.
    pub fn delete(&self, id: RecordId) -> RepoResult<bool> {
        let conn = self.store.connect()?;
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", R::SCHEMA.table),
            [id],
        )?;

        if changed == 0 {
            debug!(
                "event=record_delete module=repo status=noop table={} id={}",
                R::SCHEMA.table,
                id
            );
        } else {
            info!(
                "event=record_delete module=repo status=ok table={} id={}",
                R::SCHEMA.table,
                id
            );
        }
        Ok(changed > 0)
    }

    pub fn get(&self, id: RecordId) -> RepoResult<Option<R>> {
        let conn = self.store.connect()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1;", R::SELECT_SQL))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(R::from_row(row)?));
        }
        Ok(None)
    }

    /// Reads every row, ordered by ID.
    pub fn list_all(&self) -> RepoResult<Vec<R>> {
        let conn = self.store.connect()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC;", R::SELECT_SQL))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(R::from_row(row)?);
        }
        Ok(records)
    }

    pub(crate) fn connect(&self) -> RepoResult<Connection> {
        Ok(self.store.connect()?)
    }
}

/// Decodes a SQLite boolean column, rejecting anything but `0`/`1`.
pub(crate) fn parse_flag(table: &str, column: &str, value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean `{other}` in {table}.{column}"
        ))),
    }
}
