//! Repository port for dependency edge persistence and lookup.

use crate::dependency::domain::{Dependency, DependencyEdge, ProjectId, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for dependency repository operations.
pub type DependencyRepositoryResult<T> = Result<T, DependencyRepositoryError>;

/// Dependency edge persistence contract.
///
/// Implementations store edges and answer lookups; they perform no business
/// validation beyond the pair-uniqueness constraint.
#[async_trait]
pub trait DependencyRepository: Send + Sync {
    /// Stores a new edge.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyRepositoryError::DuplicateEdge`] when the ordered
    /// pair already exists. Implementations that re-validate at commit time
    /// return [`DependencyRepositoryError::WouldCycle`] when they find a
    /// closing path and [`DependencyRepositoryError::EdgeLimitReached`] when
    /// the project is already at its edge ceiling.
    async fn insert(&self, dependency: &Dependency) -> DependencyRepositoryResult<()>;

    /// Deletes the edge for the given pair and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyRepositoryError::NotFound`] when no edge exists for
    /// the pair.
    async fn delete_by_pair(&self, edge: DependencyEdge) -> DependencyRepositoryResult<Dependency>;

    /// Finds the edge for the given pair.
    ///
    /// Returns `None` when no such edge exists.
    async fn find_by_pair(
        &self,
        edge: DependencyEdge,
    ) -> DependencyRepositoryResult<Option<Dependency>>;

    /// Returns whether an edge exists for the given pair.
    async fn exists(&self, edge: DependencyEdge) -> DependencyRepositoryResult<bool>;

    /// Returns edges whose dependent is `task_id`, ordered by creation time.
    async fn find_prerequisites_of(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<Dependency>>;

    /// Returns edges whose prerequisite is `task_id`, ordered by creation
    /// time.
    async fn find_dependents_of(&self, task_id: TaskId)
    -> DependencyRepositoryResult<Vec<Dependency>>;

    /// Returns the number of edges recorded for a project.
    async fn count_in_project(&self, project_id: ProjectId) -> DependencyRepositoryResult<usize>;
}

/// Narrow read interface used by reachability searches.
///
/// Every [`DependencyRepository`] provides it; graph fixtures can implement
/// it directly.
#[async_trait]
pub trait EdgeQuery: Send + Sync {
    /// Returns the direct prerequisites of `task_id`.
    async fn direct_prerequisites(&self, task_id: TaskId)
    -> DependencyRepositoryResult<Vec<TaskId>>;
}

#[async_trait]
impl<R> EdgeQuery for R
where
    R: DependencyRepository + ?Sized,
{
    async fn direct_prerequisites(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<TaskId>> {
        let edges = self.find_prerequisites_of(task_id).await?;
        Ok(edges.iter().map(Dependency::prerequisite_id).collect())
    }
}

/// Errors returned by dependency repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DependencyRepositoryError {
    /// An edge for the ordered pair already exists.
    #[error("duplicate dependency: {0}")]
    DuplicateEdge(DependencyEdge),

    /// No edge exists for the ordered pair.
    #[error("dependency not found: {0}")]
    NotFound(DependencyEdge),

    /// The store refused the edge because it would close a cycle.
    #[error("dependency would close a cycle: {0}")]
    WouldCycle(DependencyEdge),

    /// The store refused the edge because the project is at its edge
    /// ceiling.
    #[error("project {project_id} already holds {limit} dependencies")]
    EdgeLimitReached {
        /// Project at its ceiling.
        project_id: ProjectId,
        /// Configured ceiling.
        limit: usize,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DependencyRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
