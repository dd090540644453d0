//! Application services for the dependency graph engine.

mod graph;
mod locks;
mod queries;
mod reachability;

pub use graph::{
    AddDependencyRequest, DependencyService, DependencyServiceError, DependencyServiceResult,
    GraphBound, InfrastructureError, RemoveDependencyRequest,
};
pub use locks::{ProjectGuard, ProjectLocks};
pub use queries::{DependencyQueryService, TaskDependencies};
pub use reachability::{ReachabilityChecker, ReachabilityError};
