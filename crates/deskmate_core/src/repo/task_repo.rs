//! `tasks` table mapping and the completion toggle.
//!
//! # Invariants
//! - `toggle_completed` flips the flag inside SQLite (`NOT is_completed`);
//!   the current value is never read back into the application first.

use crate::db::{schema, TableSchema};
use crate::model::task::{NewTask, Priority, Task};
use crate::model::timestamp::{format_timestamp, parse_timestamp};
use crate::model::validation::ValidationError;
use crate::model::RecordId;
use crate::repo::record_repo::{parse_flag, Record, RecordTable, RepoError, RepoResult};
use log::{debug, info};
use rusqlite::{params, Connection, Row};

pub type TaskTable = RecordTable<Task>;

impl Record for Task {
    type Draft = NewTask;

    const SCHEMA: TableSchema = schema::TASKS;
    const SELECT_SQL: &'static str =
        "SELECT id, title, priority, due_date, is_completed FROM tasks";

    fn validate_draft(draft: &NewTask) -> Result<(), ValidationError> {
        draft.validate()
    }

    fn insert(conn: &Connection, id: RecordId, draft: &NewTask) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO tasks (id, title, priority, due_date) VALUES (?1, ?2, ?3, ?4);",
            params![
                id,
                draft.title.as_str(),
                draft.priority.as_str(),
                format_timestamp(&draft.due_date),
            ],
        )?;
        Ok(())
    }

    fn from_draft(id: RecordId, draft: &NewTask) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            priority: draft.priority,
            due_date: draft.due_date,
            is_completed: false,
        }
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let priority_text: String = row.get("priority")?;
        let priority = priority_text.parse::<Priority>().map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid priority `{priority_text}` in tasks.priority"
            ))
        })?;

        let due_text: String = row.get("due_date")?;
        let due_date = parse_timestamp(&due_text).map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{due_text}` in tasks.due_date: {err}"
            ))
        })?;

        let is_completed = parse_flag("tasks", "is_completed", row.get("is_completed")?)?;

        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            priority,
            due_date,
            is_completed,
        })
    }
}

impl RecordTable<Task> {
    /// Flips `is_completed` with one UPDATE statement.
    ///
    /// Returns whether a row matched; a missing ID is a no-op.
    pub fn toggle_completed(&self, id: RecordId) -> RepoResult<bool> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE tasks SET is_completed = NOT is_completed WHERE id = ?1;",
            [id],
        )?;
        if changed == 0 {
            debug!("event=task_toggle module=repo status=noop id={id}");
        } else {
            info!("event=task_toggle module=repo status=ok id={id}");
        }
        Ok(changed > 0)
    }
}
