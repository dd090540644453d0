//! Port for resolving tasks owned by the external task collaborator.

use crate::dependency::domain::{TaskId, TaskSummary};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task directory operations.
pub type TaskDirectoryResult<T> = Result<T, TaskDirectoryError>;

/// Task lookup contract.
///
/// Implementations decide how a task maps to its project (directly or through
/// its containing list); the dependency engine only sees the result.
#[async_trait]
pub trait TaskDirectory: Send + Sync {
    /// Resolves a task.
    ///
    /// Returns `None` when the task does not exist.
    async fn resolve(&self, task_id: TaskId) -> TaskDirectoryResult<Option<TaskSummary>>;
}

/// Errors returned by task directory implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskDirectoryError {
    /// The task collaborator could not answer.
    #[error("task directory unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskDirectoryError {
    /// Wraps an underlying lookup failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
