//! Repository layer: one SQLite table per record kind.
//!
//! # Responsibility
//! - Share create/list/get/delete and ID allocation across record kinds.
//! - Keep SQL details out of the manager layer.
//!
//! # Invariants
//! - Repository writes validate drafts before persistence.
//! - Missing IDs on delete/toggle/mark are reported as `false`, not errors.

pub mod event_repo;
pub mod note_repo;
pub mod record_repo;
pub mod task_repo;
