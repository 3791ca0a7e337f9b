#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::task::model::Task;

/// Load/save boundary for the task collection. The whole collection is
/// rewritten on every save; there is no incremental form.
#[derive(Debug, Clone)]
pub struct TaskStorage {
    path: PathBuf,
}

impl TaskStorage {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file means a fresh store. A file that exists but cannot
    /// be read or parsed is an error, never an empty collection.
    pub fn load(&self) -> anyhow::Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let tasks: Vec<Task> = serde_json::from_slice(&data)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(tasks)
    }

    pub fn save(&self, tasks: &[Task]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(tasks)?;
        std::fs::write(&tmp, &data)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path).with_context(|| {
            format!(
                "failed to rename {} -> {}",
                tmp.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::model::TaskStatus;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = TaskStorage::new(dir.path().join("tasks.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_the_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = TaskStorage::new(dir.path().join("nested").join("tasks.json"));

        let tasks = vec![
            Task {
                id: 1,
                description: "buy milk".to_owned(),
                status: TaskStatus::Pending,
                created_at: "2025-01-02T03:04:05Z".to_owned(),
            },
            Task {
                id: 2,
                description: "return library books".to_owned(),
                status: TaskStatus::Completed,
                created_at: "2025-01-02T03:05:00Z".to_owned(),
            },
        ];
        storage.save(&tasks).unwrap();
        assert_eq!(storage.load().unwrap(), tasks);
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "this is not json").unwrap();
        let storage = TaskStorage::new(path);
        assert!(storage.load().is_err());
    }
}
