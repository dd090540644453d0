//! Read-only view of a task resolved through the task directory.

use super::{ProjectId, TaskId};
use serde::{Deserialize, Serialize};

/// Task data the dependency engine needs from the task collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    id: TaskId,
    project_id: ProjectId,
    name: String,
}

impl TaskSummary {
    /// Creates a task summary.
    #[must_use]
    pub fn new(id: TaskId, project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            project_id,
            name: name.into(),
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the display name used in activity descriptions.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
