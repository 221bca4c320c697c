//! Domain records for notes, tasks and calendar events.
//!
//! # Responsibility
//! - Define the persisted shapes and their caller-facing drafts.
//! - Own input validation shared by every manager.
//!
//! # Invariants
//! - Every record is identified by a positive `RecordId` unique in its table.
//! - IDs are assigned by the repository, never by callers or SQLite.
//! - Deletion is a hard delete; there are no tombstones.

pub mod event;
pub mod note;
pub mod task;
pub mod timestamp;
pub mod validation;

/// Integer primary key of a record. Always `>= 1`.
pub type RecordId = i64;
