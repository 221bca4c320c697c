//! Table definitions for every record kind.
//!
//! Each record kind owns exactly one table; the DDL lives next to this file
//! as plain SQL.

/// DDL for one record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub table: &'static str,
    pub create_sql: &'static str,
}

pub const NOTES: TableSchema = TableSchema {
    table: "notes",
    create_sql: include_str!("notes.sql"),
};

pub const TASKS: TableSchema = TableSchema {
    table: "tasks",
    create_sql: include_str!("tasks.sql"),
};

pub const EVENTS: TableSchema = TableSchema {
    table: "events",
    create_sql: include_str!("events.sql"),
};
