//! Port for the project activity feed.

use crate::dependency::domain::DependencyActivity;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for activity log operations.
pub type ActivityLogResult<T> = Result<T, ActivityLogError>;

/// Audit sink for dependency graph changes.
///
/// Recording is best-effort from the dependency engine's point of view:
/// failures are logged by callers and never undo a committed change.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Appends an activity to the project's feed.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError`] when the sink rejects or cannot accept the
    /// event.
    async fn record(&self, activity: &DependencyActivity) -> ActivityLogResult<()>;
}

/// Errors returned by activity log implementations.
#[derive(Debug, Clone, Error)]
pub enum ActivityLogError {
    /// The sink refused the event, e.g. because the actor or project is
    /// unknown to it.
    #[error("activity rejected: {0}")]
    Rejected(String),

    /// The sink could not be reached.
    #[error("activity log unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl ActivityLogError {
    /// Wraps an underlying sink failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
