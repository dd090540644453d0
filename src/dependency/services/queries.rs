//! Read-only lookups exposed to the boundary layer.

use super::graph::DependencyServiceResult;
use crate::dependency::{
    domain::{Dependency, TaskId},
    ports::DependencyRepository,
};
use std::sync::Arc;

/// Both directions of a task's dependency edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDependencies {
    /// Edges whose dependent is the task.
    pub prerequisites: Vec<Dependency>,
    /// Edges whose prerequisite is the task.
    pub dependents: Vec<Dependency>,
}

/// Lock-free query surface over committed edges.
///
/// Results are read straight from the store on every call.
#[derive(Debug)]
pub struct DependencyQueryService<R>
where
    R: DependencyRepository,
{
    repository: Arc<R>,
}

impl<R> Clone for DependencyQueryService<R>
where
    R: DependencyRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> DependencyQueryService<R>
where
    R: DependencyRepository,
{
    /// Creates a query service over `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists the tasks `task_id` waits on.
    ///
    /// # Errors
    ///
    /// Returns [`super::DependencyServiceError::Infrastructure`] when storage
    /// fails.
    pub async fn prerequisites_of(&self, task_id: TaskId) -> DependencyServiceResult<Vec<TaskId>> {
        let edges = self.repository.find_prerequisites_of(task_id).await?;
        Ok(edges.iter().map(Dependency::prerequisite_id).collect())
    }

    /// Lists the tasks blocked by `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`super::DependencyServiceError::Infrastructure`] when storage
    /// fails.
    pub async fn dependents_of(&self, task_id: TaskId) -> DependencyServiceResult<Vec<TaskId>> {
        let edges = self.repository.find_dependents_of(task_id).await?;
        Ok(edges.iter().map(Dependency::dependent_id).collect())
    }

    /// Returns both directions of `task_id`'s edges.
    ///
    /// # Errors
    ///
    /// Returns [`super::DependencyServiceError::Infrastructure`] when storage
    /// fails.
    pub async fn edges_of(&self, task_id: TaskId) -> DependencyServiceResult<TaskDependencies> {
        let prerequisites = self.repository.find_prerequisites_of(task_id).await?;
        let dependents = self.repository.find_dependents_of(task_id).await?;
        Ok(TaskDependencies {
            prerequisites,
            dependents,
        })
    }
}
