//! Domain model for the task dependency graph.
//!
//! Tasks are external and referenced by identifier only. The domain owns the
//! dependency edge, its endpoint pair, and the activity events describing
//! graph changes.

mod activity;
mod dependency;
mod error;
mod ids;
mod task_summary;

pub use activity::{DEPENDENCY_ENTITY_TYPE, DependencyActivity, DependencyActivityKind, TaskLabel};
pub use dependency::{Dependency, DependencyEdge, PersistedDependencyData};
pub use error::{DependencyDomainError, ParseActivityKindError};
pub use ids::{ActorName, DependencyId, ProjectId, TaskId};
pub use task_summary::TaskSummary;
