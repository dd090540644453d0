//! In-memory adapters for the dependency graph engine.

mod activity_log;
mod repository;
mod task_directory;

pub use activity_log::InMemoryActivityLog;
pub use repository::InMemoryDependencyRepository;
pub use task_directory::InMemoryTaskDirectory;
