//! `notes` table mapping.

use crate::db::{schema, TableSchema};
use crate::model::note::{NewNote, Note};
use crate::model::validation::ValidationError;
use crate::model::RecordId;
use crate::repo::record_repo::{Record, RecordTable, RepoResult};
use rusqlite::{params, Connection, Row};

pub type NoteTable = RecordTable<Note>;

impl Record for Note {
    type Draft = NewNote;

    const SCHEMA: TableSchema = schema::NOTES;
    const SELECT_SQL: &'static str = "SELECT id, title, content FROM notes";

    fn validate_draft(draft: &NewNote) -> Result<(), ValidationError> {
        draft.validate()
    }

    fn insert(conn: &Connection, id: RecordId, draft: &NewNote) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO notes (id, title, content) VALUES (?1, ?2, ?3);",
            params![id, draft.title.as_str(), draft.content.as_str()],
        )?;
        Ok(())
    }

    fn from_draft(id: RecordId, draft: &NewNote) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            content: draft.content.clone(),
        }
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            content: row.get("content")?,
        })
    }
}
