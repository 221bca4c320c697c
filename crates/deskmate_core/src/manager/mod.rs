//! Use-case managers, one per record kind.
//!
//! # Responsibility
//! - Expose the operations the presentation layer calls.
//! - Keep callers decoupled from table and SQL details.
//!
//! # Invariants
//! - Managers never bypass repository validation or ID allocation.

pub mod calendar;
pub mod notes;
pub mod tasks;
