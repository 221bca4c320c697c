//! Task manager.

use crate::db::Store;
use crate::model::task::{NewTask, Priority, Task};
use crate::model::RecordId;
use crate::repo::record_repo::RepoResult;
use crate::repo::task_repo::TaskTable;
use chrono::NaiveDateTime;

pub struct TaskManager {
    table: TaskTable,
}

impl TaskManager {
    /// Binds to `store`, creating the `tasks` table when absent.
    pub fn open(store: Store) -> RepoResult<Self> {
        Ok(Self {
            table: TaskTable::open(store)?,
        })
    }

    /// Creates an open task under the smallest free ID.
    pub fn create_task(
        &self,
        title: impl Into<String>,
        priority: Priority,
        due_date: NaiveDateTime,
    ) -> RepoResult<Task> {
        self.table.create(&NewTask::new(title, priority, due_date))
    }

    /// Deletes a task. Unknown IDs are ignored.
    pub fn delete_task(&self, id: RecordId) -> RepoResult<()> {
        self.table.delete(id)?;
        Ok(())
    }

    /// Flips the completion flag. Unknown IDs are ignored.
    pub fn toggle_task_status(&self, id: RecordId) -> RepoResult<()> {
        self.table.toggle_completed(id)?;
        Ok(())
    }

    pub fn get_all_tasks(&self) -> RepoResult<Vec<Task>> {
        self.table.list_all()
    }
}
