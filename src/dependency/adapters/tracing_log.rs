//! Activity log that writes dependency changes to the `tracing` pipeline.

use async_trait::async_trait;

use crate::dependency::{
    domain::DependencyActivity,
    ports::{ActivityLog, ActivityLogResult},
};

/// Activity log emitting one structured `info` event per change.
///
/// Useful when no persistent activity feed is wired up; the events are
/// routed wherever the installed subscriber sends them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingActivityLog;

impl TracingActivityLog {
    /// Creates a tracing-backed activity log.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActivityLog for TracingActivityLog {
    async fn record(&self, activity: &DependencyActivity) -> ActivityLogResult<()> {
        tracing::info!(
            target: "boardgraph::activity",
            project_id = %activity.project_id(),
            actor = %activity.actor(),
            kind = activity.kind().as_str(),
            action = activity.kind().action(),
            entity_type = activity.entity_type(),
            dependent_id = %activity.dependent_id(),
            prerequisite_id = %activity.prerequisite_id(),
            occurred_at = %activity.occurred_at(),
            "{}",
            activity.description()
        );
        Ok(())
    }
}
