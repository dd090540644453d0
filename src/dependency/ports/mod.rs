//! Port contracts for the dependency graph engine.
//!
//! Ports define infrastructure-agnostic interfaces used by dependency
//! services: the edge store it owns, and the task directory and activity log
//! it consumes.

pub mod activity_log;
pub mod repository;
pub mod task_directory;

pub use activity_log::{ActivityLog, ActivityLogError, ActivityLogResult};
pub use repository::{
    DependencyRepository, DependencyRepositoryError, DependencyRepositoryResult, EdgeQuery,
};
pub use task_directory::{TaskDirectory, TaskDirectoryError, TaskDirectoryResult};
