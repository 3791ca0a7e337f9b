#![forbid(unsafe_code)]

use crate::error::TtrackError;
use crate::task::model::{Task, TaskStatus};
use crate::task::storage::TaskStorage;

/// Owns the full task collection and id assignment. Every mutation is
/// written through to storage before it returns.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    storage: TaskStorage,
}

impl TaskStore {
    /// Hydrates from the data file. The next id is recomputed from the
    /// persisted ids; it is not stored separately.
    pub fn open(storage: TaskStorage) -> anyhow::Result<Self> {
        let tasks = storage.load()?;
        let next_id = tasks.iter().map(|t| t.id).max().map_or(1, |max| max + 1);
        Ok(Self {
            tasks,
            next_id,
            storage,
        })
    }

    /// All tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn add(&mut self, description: &str) -> anyhow::Result<Task> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TtrackError::EmptyDescription.into());
        }
        let task = Task {
            id: self.next_id,
            description: description.to_owned(),
            status: TaskStatus::Pending,
            created_at: now_rfc3339(),
        };
        self.next_id += 1;
        self.tasks.push(task.clone());
        self.storage.save(&self.tasks)?;
        Ok(task)
    }

    /// Completes a task only from `Pending`. Use [`Self::set_status`] to
    /// force a status from any state.
    pub fn complete(&mut self, id: u64) -> anyhow::Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        if task.status != TaskStatus::Pending {
            return Ok(false);
        }
        task.status = TaskStatus::Completed;
        self.storage.save(&self.tasks)?;
        Ok(true)
    }

    /// Removed ids are not reassigned for the lifetime of this store.
    pub fn remove(&mut self, id: u64) -> anyhow::Result<bool> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        self.tasks.remove(pos);
        self.storage.save(&self.tasks)?;
        Ok(true)
    }

    pub fn edit(&mut self, id: u64, new_description: &str) -> anyhow::Result<bool> {
        let new_description = new_description.trim();
        if new_description.is_empty() {
            return Ok(false);
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.description = new_description.to_owned();
        self.storage.save(&self.tasks)?;
        Ok(true)
    }

    /// Unrestricted status assignment, including re-setting the current
    /// status.
    pub fn set_status(&mut self, id: u64, status: TaskStatus) -> anyhow::Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.status = status;
        self.storage.save(&self.tasks)?;
        Ok(true)
    }
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_owned())
}
