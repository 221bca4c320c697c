//! Note manager.
//!
//! Every listing re-reads the table; nothing is cached in memory.

use crate::db::Store;
use crate::model::note::{NewNote, Note};
use crate::model::RecordId;
use crate::repo::note_repo::NoteTable;
use crate::repo::record_repo::RepoResult;

pub struct NoteManager {
    table: NoteTable,
}

impl NoteManager {
    /// Binds to `store`, creating the `notes` table when absent.
    pub fn open(store: Store) -> RepoResult<Self> {
        Ok(Self {
            table: NoteTable::open(store)?,
        })
    }

    /// Creates a note under the smallest free ID.
    pub fn create_note(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> RepoResult<Note> {
        self.table.create(&NewNote::new(title, content))
    }

    /// Deletes a note. Unknown IDs are ignored.
    pub fn delete_note(&self, id: RecordId) -> RepoResult<()> {
        self.table.delete(id)?;
        Ok(())
    }

    pub fn get_all_notes(&self) -> RepoResult<Vec<Note>> {
        self.table.list_all()
    }
}
