//! In-memory project activity feed.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::dependency::{
    domain::{DependencyActivity, DependencyActivityKind, ProjectId},
    ports::{ActivityLog, ActivityLogError, ActivityLogResult},
};

/// Thread-safe activity log that keeps every recorded event.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityLog {
    entries: Arc<RwLock<Vec<DependencyActivity>>>,
}

impl InMemoryActivityLog {
    /// Creates an empty activity log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a project's activities, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError::Unavailable`] when the lock is poisoned.
    pub fn project_activities(
        &self,
        project_id: ProjectId,
    ) -> ActivityLogResult<Vec<DependencyActivity>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .iter()
            .rev()
            .filter(|activity| activity.project_id() == project_id)
            .cloned()
            .collect())
    }

    /// Returns at most `limit` of a project's most recent activities.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError::Unavailable`] when the lock is poisoned.
    pub fn recent_project_activities(
        &self,
        project_id: ProjectId,
        limit: usize,
    ) -> ActivityLogResult<Vec<DependencyActivity>> {
        let mut activities = self.project_activities(project_id)?;
        activities.truncate(limit);
        Ok(activities)
    }

    /// Returns a project's activities of one kind, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError::Unavailable`] when the lock is poisoned.
    pub fn activities_by_kind(
        &self,
        project_id: ProjectId,
        kind: DependencyActivityKind,
    ) -> ActivityLogResult<Vec<DependencyActivity>> {
        let activities = self.project_activities(project_id)?;
        Ok(activities
            .into_iter()
            .filter(|activity| activity.kind() == kind)
            .collect())
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> ActivityLogError {
    ActivityLogError::unavailable(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn record(&self, activity: &DependencyActivity) -> ActivityLogResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.push(activity.clone());
        Ok(())
    }
}
