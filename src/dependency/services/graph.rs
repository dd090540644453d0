//! Service layer validating and applying dependency graph mutations.

use super::{
    locks::ProjectLocks,
    reachability::{ReachabilityChecker, ReachabilityError},
};
use crate::config::{ConfigError, DependencyGraphConfig};
use crate::dependency::{
    domain::{
        ActorName, Dependency, DependencyActivity, DependencyDomainError, DependencyEdge,
        ProjectId, TaskId, TaskLabel, TaskSummary,
    },
    ports::{
        ActivityLog, DependencyRepository, DependencyRepositoryError, TaskDirectory,
        TaskDirectoryError,
    },
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for adding a dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddDependencyRequest {
    dependent_id: TaskId,
    prerequisite_id: TaskId,
    actor: String,
}

impl AddDependencyRequest {
    /// Creates a request stating that `dependent_id` cannot finish before
    /// `prerequisite_id`.
    #[must_use]
    pub fn new(dependent_id: TaskId, prerequisite_id: TaskId, actor: impl Into<String>) -> Self {
        Self {
            dependent_id,
            prerequisite_id,
            actor: actor.into(),
        }
    }
}

/// Request payload for removing a dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveDependencyRequest {
    dependent_id: TaskId,
    prerequisite_id: TaskId,
    actor: String,
}

impl RemoveDependencyRequest {
    /// Creates a request removing the edge `dependent_id -> prerequisite_id`.
    #[must_use]
    pub fn new(dependent_id: TaskId, prerequisite_id: TaskId, actor: impl Into<String>) -> Self {
        Self {
            dependent_id,
            prerequisite_id,
            actor: actor.into(),
        }
    }
}

/// Which bound a project's graph exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphBound {
    /// Distinct tasks visited by one cycle check.
    TraversalNodes,
    /// Edges stored for one project.
    ProjectEdges,
}

impl fmt::Display for GraphBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TraversalNodes => f.write_str("visited tasks"),
            Self::ProjectEdges => f.write_str("edges"),
        }
    }
}

/// Transient failure of a collaborator the service depends on.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// The edge store failed.
    #[error(transparent)]
    Repository(DependencyRepositoryError),
    /// The task directory failed.
    #[error(transparent)]
    TaskDirectory(TaskDirectoryError),
}

/// Service-level errors for dependency graph operations.
///
/// Every variant except [`DependencyServiceError::Infrastructure`] reports
/// rejected input and is not worth retrying.
#[derive(Debug, Error)]
pub enum DependencyServiceError {
    /// A task was named as its own prerequisite.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// The exact ordered edge already exists.
    #[error("task {} already depends on task {}", .0.dependent_id(), .0.prerequisite_id())]
    DuplicateEdge(DependencyEdge),

    /// A referenced task does not resolve.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// The two tasks belong to different projects.
    #[error(
        "tasks must belong to the same project: task {dependent} is in project \
         {dependent_project}, task {prerequisite} is in project {prerequisite_project}"
    )]
    CrossProjectDependency {
        /// Blocked task.
        dependent: TaskId,
        /// Project of the blocked task.
        dependent_project: ProjectId,
        /// Prerequisite task.
        prerequisite: TaskId,
        /// Project of the prerequisite task.
        prerequisite_project: ProjectId,
    },

    /// Adding the edge would close a directed cycle.
    #[error(
        "adding a dependency of task {} on task {} would create a cycle",
        .0.dependent_id(),
        .0.prerequisite_id()
    )]
    CycleDetected(DependencyEdge),

    /// No edge exists for the given pair.
    #[error("no dependency of task {dependent} on task {prerequisite} exists")]
    NotFound {
        /// Blocked task.
        dependent: TaskId,
        /// Prerequisite task.
        prerequisite: TaskId,
    },

    /// A project's graph exceeded a configured bound.
    #[error("dependency graph of project {project_id} exceeds the limit of {limit} {bound}")]
    GraphTooLarge {
        /// Project whose graph is too large.
        project_id: ProjectId,
        /// Bound that was exceeded.
        bound: GraphBound,
        /// Configured limit.
        limit: usize,
    },

    /// The actor performing the change is invalid.
    #[error("invalid actor: {0}")]
    InvalidActor(DependencyDomainError),

    /// Storage or lookup failed; the request may be retried.
    #[error("dependency storage is temporarily unavailable")]
    Infrastructure(#[source] InfrastructureError),
}

impl DependencyServiceError {
    /// Returns whether the error reports rejected input rather than a
    /// transient failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::Infrastructure(_))
    }
}

impl From<DependencyDomainError> for DependencyServiceError {
    fn from(err: DependencyDomainError) -> Self {
        match err {
            DependencyDomainError::SelfDependency(task_id) => Self::SelfDependency(task_id),
            DependencyDomainError::EmptyActor => Self::InvalidActor(err),
        }
    }
}

impl From<DependencyRepositoryError> for DependencyServiceError {
    fn from(err: DependencyRepositoryError) -> Self {
        match err {
            DependencyRepositoryError::DuplicateEdge(edge) => Self::DuplicateEdge(edge),
            DependencyRepositoryError::WouldCycle(edge) => Self::CycleDetected(edge),
            DependencyRepositoryError::NotFound(edge) => Self::NotFound {
                dependent: edge.dependent_id(),
                prerequisite: edge.prerequisite_id(),
            },
            DependencyRepositoryError::EdgeLimitReached { project_id, limit } => {
                Self::GraphTooLarge {
                    project_id,
                    bound: GraphBound::ProjectEdges,
                    limit,
                }
            }
            DependencyRepositoryError::Persistence(_) => {
                Self::Infrastructure(InfrastructureError::Repository(err))
            }
        }
    }
}

impl From<TaskDirectoryError> for DependencyServiceError {
    fn from(err: TaskDirectoryError) -> Self {
        Self::Infrastructure(InfrastructureError::TaskDirectory(err))
    }
}

/// Result type for dependency service operations.
pub type DependencyServiceResult<T> = Result<T, DependencyServiceError>;

/// Sole entry point for mutating the dependency graph.
///
/// Additions and removals of one project are serialized: duplicate, size and
/// cycle checks run under the project's lock together with the write, so two
/// individually valid edges can never jointly close a cycle.
pub struct DependencyService<R, D, A, C>
where
    R: DependencyRepository,
    D: TaskDirectory,
    A: ActivityLog,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: Arc<D>,
    activity_log: Arc<A>,
    clock: Arc<C>,
    locks: Arc<ProjectLocks>,
    checker: ReachabilityChecker,
    max_edges_per_project: usize,
}

impl<R, D, A, C> Clone for DependencyService<R, D, A, C>
where
    R: DependencyRepository,
    D: TaskDirectory,
    A: ActivityLog,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            directory: Arc::clone(&self.directory),
            activity_log: Arc::clone(&self.activity_log),
            clock: Arc::clone(&self.clock),
            locks: Arc::clone(&self.locks),
            checker: self.checker,
            max_edges_per_project: self.max_edges_per_project,
        }
    }
}

impl<R, D, A, C> DependencyService<R, D, A, C>
where
    R: DependencyRepository,
    D: TaskDirectory,
    A: ActivityLog,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default graph limits.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        directory: Arc<D>,
        activity_log: Arc<A>,
        clock: Arc<C>,
    ) -> Self {
        let config = DependencyGraphConfig::default();
        Self {
            repository,
            directory,
            activity_log,
            clock,
            locks: Arc::new(ProjectLocks::new()),
            checker: ReachabilityChecker::new(config.max_traversal_nodes),
            max_edges_per_project: config.max_edges_per_project,
        }
    }

    /// Replaces the graph limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] when a limit is zero.
    pub fn with_config(mut self, config: DependencyGraphConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        self.checker = ReachabilityChecker::new(config.max_traversal_nodes);
        self.max_edges_per_project = config.max_edges_per_project;
        Ok(self)
    }

    /// Adds the edge `dependent -> prerequisite` after checking every graph
    /// invariant, then records a `DEPENDENCY_ADDED` activity.
    ///
    /// A failure to record the activity is logged and does not undo the
    /// edge.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::SelfDependency`] whenever both ids
    /// match, [`DependencyServiceError::InvalidActor`],
    /// [`DependencyServiceError::TaskNotFound`],
    /// [`DependencyServiceError::CrossProjectDependency`],
    /// [`DependencyServiceError::DuplicateEdge`],
    /// [`DependencyServiceError::GraphTooLarge`] or
    /// [`DependencyServiceError::CycleDetected`] when the edge is rejected,
    /// and [`DependencyServiceError::Infrastructure`] when a collaborator
    /// fails.
    pub async fn add_dependency(
        &self,
        request: AddDependencyRequest,
    ) -> DependencyServiceResult<Dependency> {
        let edge = DependencyEdge::new(request.dependent_id, request.prerequisite_id)?;
        let actor = ActorName::new(request.actor)?;
        tracing::debug!(%edge, %actor, "adding dependency");

        let dependent = self.resolve_task(edge.dependent_id()).await?;
        let prerequisite = self.resolve_task(edge.prerequisite_id()).await?;
        let project_id = same_project(&dependent, &prerequisite)?;

        let dependency = {
            let _guard = self.locks.acquire(project_id).await;
            self.commit_edge(project_id, edge).await?
        };
        tracing::info!(
            dependency_id = %dependency.id(),
            %project_id,
            %edge,
            %actor,
            "dependency added"
        );

        let activity = DependencyActivity::added(
            project_id,
            actor,
            &TaskLabel::named(dependent.id(), dependent.name()),
            &TaskLabel::named(prerequisite.id(), prerequisite.name()),
            &*self.clock,
        );
        self.emit(&activity).await;
        Ok(dependency)
    }

    /// Removes the edge `dependent -> prerequisite`, then records a
    /// `DEPENDENCY_REMOVED` activity.
    ///
    /// Removal succeeds even when the endpoint tasks no longer resolve; the
    /// activity then names them by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::NotFound`] when no such edge exists,
    /// [`DependencyServiceError::InvalidActor`] for an empty actor, and
    /// [`DependencyServiceError::Infrastructure`] when storage fails.
    pub async fn remove_dependency(
        &self,
        request: RemoveDependencyRequest,
    ) -> DependencyServiceResult<Dependency> {
        let actor = ActorName::new(request.actor)?;
        let Ok(edge) = DependencyEdge::new(request.dependent_id, request.prerequisite_id) else {
            return Err(DependencyServiceError::NotFound {
                dependent: request.dependent_id,
                prerequisite: request.prerequisite_id,
            });
        };
        tracing::debug!(%edge, %actor, "removing dependency");

        let existing = self.repository.find_by_pair(edge).await?.ok_or(
            DependencyServiceError::NotFound {
                dependent: edge.dependent_id(),
                prerequisite: edge.prerequisite_id(),
            },
        )?;
        let project_id = existing.project_id();
        let removed = {
            let _guard = self.locks.acquire(project_id).await;
            self.repository.delete_by_pair(edge).await?
        };
        tracing::info!(
            dependency_id = %removed.id(),
            %project_id,
            %edge,
            %actor,
            "dependency removed"
        );

        let dependent = self.label_for(edge.dependent_id()).await;
        let prerequisite = self.label_for(edge.prerequisite_id()).await;
        let activity =
            DependencyActivity::removed(project_id, actor, &dependent, &prerequisite, &*self.clock);
        self.emit(&activity).await;
        Ok(removed)
    }

    /// Returns the edges whose dependent is `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::Infrastructure`] when storage fails.
    pub async fn get_prerequisites_of(
        &self,
        task_id: TaskId,
    ) -> DependencyServiceResult<Vec<Dependency>> {
        Ok(self.repository.find_prerequisites_of(task_id).await?)
    }

    /// Returns the edges whose prerequisite is `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::Infrastructure`] when storage fails.
    pub async fn get_dependents_of(
        &self,
        task_id: TaskId,
    ) -> DependencyServiceResult<Vec<Dependency>> {
        Ok(self.repository.find_dependents_of(task_id).await?)
    }

    async fn resolve_task(&self, task_id: TaskId) -> DependencyServiceResult<TaskSummary> {
        self.directory
            .resolve(task_id)
            .await?
            .ok_or(DependencyServiceError::TaskNotFound(task_id))
    }

    /// Runs the duplicate, size and cycle checks and inserts the edge.
    ///
    /// Callers must hold the project's lock.
    async fn commit_edge(
        &self,
        project_id: ProjectId,
        edge: DependencyEdge,
    ) -> DependencyServiceResult<Dependency> {
        if self.repository.exists(edge).await? {
            return Err(DependencyServiceError::DuplicateEdge(edge));
        }

        let edge_count = self.repository.count_in_project(project_id).await?;
        if edge_count >= self.max_edges_per_project {
            return Err(DependencyServiceError::GraphTooLarge {
                project_id,
                bound: GraphBound::ProjectEdges,
                limit: self.max_edges_per_project,
            });
        }

        let closes_cycle = self
            .checker
            .creates_cycle(&*self.repository, edge)
            .await
            .map_err(|err| match err {
                ReachabilityError::GraphTooLarge { limit } => {
                    DependencyServiceError::GraphTooLarge {
                        project_id,
                        bound: GraphBound::TraversalNodes,
                        limit,
                    }
                }
                ReachabilityError::Query(source) => source.into(),
            })?;
        if closes_cycle {
            return Err(DependencyServiceError::CycleDetected(edge));
        }

        let dependency = Dependency::new(project_id, edge, &*self.clock);
        self.repository.insert(&dependency).await?;
        Ok(dependency)
    }

    async fn label_for(&self, task_id: TaskId) -> TaskLabel {
        match self.directory.resolve(task_id).await {
            Ok(Some(summary)) => TaskLabel::named(task_id, summary.name()),
            Ok(None) => TaskLabel::unresolved(task_id),
            Err(err) => {
                tracing::warn!(%task_id, error = %err, "could not resolve task name for activity");
                TaskLabel::unresolved(task_id)
            }
        }
    }

    async fn emit(&self, activity: &DependencyActivity) {
        if let Err(err) = self.activity_log.record(activity).await {
            tracing::warn!(
                project_id = %activity.project_id(),
                kind = activity.kind().as_str(),
                error = %err,
                "failed to record dependency activity"
            );
        }
    }
}

fn same_project(
    dependent: &TaskSummary,
    prerequisite: &TaskSummary,
) -> DependencyServiceResult<ProjectId> {
    if dependent.project_id() != prerequisite.project_id() {
        return Err(DependencyServiceError::CrossProjectDependency {
            dependent: dependent.id(),
            dependent_project: dependent.project_id(),
            prerequisite: prerequisite.id(),
            prerequisite_project: prerequisite.project_id(),
        });
    }
    Ok(dependent.project_id())
}
