//! In-memory task directory for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dependency::{
    domain::{ProjectId, TaskId, TaskSummary},
    ports::{TaskDirectory, TaskDirectoryError, TaskDirectoryResult},
};

/// Thread-safe task directory backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskDirectory {
    tasks: Arc<RwLock<HashMap<TaskId, TaskSummary>>>,
}

impl InMemoryTaskDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new task in `project_id` and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDirectoryError::Unavailable`] when the lock is poisoned.
    pub fn add_task(
        &self,
        project_id: ProjectId,
        name: impl Into<String>,
    ) -> TaskDirectoryResult<TaskId> {
        let summary = TaskSummary::new(TaskId::new(), project_id, name);
        let task_id = summary.id();
        self.insert(summary)?;
        Ok(task_id)
    }

    /// Inserts or replaces a task summary.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDirectoryError::Unavailable`] when the lock is poisoned.
    pub fn insert(&self, summary: TaskSummary) -> TaskDirectoryResult<()> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        tasks.insert(summary.id(), summary);
        Ok(())
    }

    /// Forgets a task, as if the task collaborator deleted it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDirectoryError::Unavailable`] when the lock is poisoned.
    pub fn remove(&self, task_id: TaskId) -> TaskDirectoryResult<Option<TaskSummary>> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        Ok(tasks.remove(&task_id))
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> TaskDirectoryError {
    TaskDirectoryError::unavailable(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskDirectory for InMemoryTaskDirectory {
    async fn resolve(&self, task_id: TaskId) -> TaskDirectoryResult<Option<TaskSummary>> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        Ok(tasks.get(&task_id).cloned())
    }
}
