//! `events` table mapping and the notified flag.

use crate::db::{schema, TableSchema};
use crate::model::event::{CalendarEvent, NewEvent};
use crate::model::timestamp::{format_timestamp, parse_timestamp};
use crate::model::validation::ValidationError;
use crate::model::RecordId;
use crate::repo::record_repo::{parse_flag, Record, RecordTable, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

pub type EventTable = RecordTable<CalendarEvent>;

impl Record for CalendarEvent {
    type Draft = NewEvent;

    const SCHEMA: TableSchema = schema::EVENTS;
    const SELECT_SQL: &'static str =
        "SELECT id, title, description, event_datetime, notified FROM events";

    fn validate_draft(draft: &NewEvent) -> Result<(), ValidationError> {
        draft.validate()
    }

    fn insert(conn: &Connection, id: RecordId, draft: &NewEvent) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO events (id, title, description, event_datetime)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id,
                draft.title.as_str(),
                draft.description.as_str(),
                format_timestamp(&draft.event_datetime),
            ],
        )?;
        Ok(())
    }

    fn from_draft(id: RecordId, draft: &NewEvent) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            event_datetime: draft.event_datetime,
            notified: false,
        }
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let datetime_text: String = row.get("event_datetime")?;
        let event_datetime = parse_timestamp(&datetime_text).map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{datetime_text}` in events.event_datetime: {err}"
            ))
        })?;

        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            event_datetime,
            notified: parse_flag("events", "notified", row.get("notified")?)?,
        })
    }
}

impl RecordTable<CalendarEvent> {
    /// Persists `notified = true`. Idempotent.
    pub fn mark_notified(&self, id: RecordId) -> RepoResult<bool> {
        let conn = self.connect()?;
        let changed = conn.execute("UPDATE events SET notified = 1 WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}
