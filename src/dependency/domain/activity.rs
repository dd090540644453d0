//! Audit events emitted when the dependency graph changes.

use super::{ActorName, ParseActivityKindError, ProjectId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Entity type recorded for every dependency activity.
pub const DEPENDENCY_ENTITY_TYPE: &str = "DEPENDENCY";

/// Kind of change recorded in the project activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyActivityKind {
    /// An edge was added.
    DependencyAdded,
    /// An edge was removed.
    DependencyRemoved,
}

impl DependencyActivityKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DependencyAdded => "DEPENDENCY_ADDED",
            Self::DependencyRemoved => "DEPENDENCY_REMOVED",
        }
    }

    /// Returns the short action verb stored alongside the kind.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::DependencyAdded => "ADDED",
            Self::DependencyRemoved => "REMOVED",
        }
    }
}

impl TryFrom<&str> for DependencyActivityKind {
    type Error = ParseActivityKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEPENDENCY_ADDED" => Ok(Self::DependencyAdded),
            "DEPENDENCY_REMOVED" => Ok(Self::DependencyRemoved),
            _ => Err(ParseActivityKindError(value.to_owned())),
        }
    }
}

/// Display label of one edge endpoint.
///
/// Falls back to the task identifier when the task no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLabel {
    id: TaskId,
    name: Option<String>,
}

impl TaskLabel {
    /// Label for a task whose name is known.
    #[must_use]
    pub fn named(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    /// Label for a task that could not be resolved.
    #[must_use]
    pub const fn unresolved(id: TaskId) -> Self {
        Self { id, name: None }
    }

    /// Returns the label text.
    #[must_use]
    pub fn text(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// One entry of the project activity feed describing a dependency change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyActivity {
    project_id: ProjectId,
    actor: ActorName,
    kind: DependencyActivityKind,
    entity_type: String,
    dependent_id: TaskId,
    prerequisite_id: TaskId,
    dependent_name: String,
    prerequisite_name: String,
    description: String,
    occurred_at: DateTime<Utc>,
}

impl DependencyActivity {
    /// Describes an edge that was just added.
    #[must_use]
    pub fn added(
        project_id: ProjectId,
        actor: ActorName,
        dependent: &TaskLabel,
        prerequisite: &TaskLabel,
        clock: &impl Clock,
    ) -> Self {
        let dependent_name = dependent.text();
        let prerequisite_name = prerequisite.text();
        let description =
            format!("Added dependency: {dependent_name} depends on {prerequisite_name}");
        Self::build(
            DependencyActivityKind::DependencyAdded,
            ActivityParts {
                project_id,
                actor,
                dependent_id: dependent.id,
                prerequisite_id: prerequisite.id,
                dependent_name,
                prerequisite_name,
                description,
            },
            clock,
        )
    }

    /// Describes an edge that was just removed.
    #[must_use]
    pub fn removed(
        project_id: ProjectId,
        actor: ActorName,
        dependent: &TaskLabel,
        prerequisite: &TaskLabel,
        clock: &impl Clock,
    ) -> Self {
        let dependent_name = dependent.text();
        let prerequisite_name = prerequisite.text();
        let description = format!(
            "Removed dependency: {dependent_name} no longer depends on {prerequisite_name}"
        );
        Self::build(
            DependencyActivityKind::DependencyRemoved,
            ActivityParts {
                project_id,
                actor,
                dependent_id: dependent.id,
                prerequisite_id: prerequisite.id,
                dependent_name,
                prerequisite_name,
                description,
            },
            clock,
        )
    }

    fn build(kind: DependencyActivityKind, parts: ActivityParts, clock: &impl Clock) -> Self {
        Self {
            project_id: parts.project_id,
            actor: parts.actor,
            kind,
            entity_type: DEPENDENCY_ENTITY_TYPE.to_owned(),
            dependent_id: parts.dependent_id,
            prerequisite_id: parts.prerequisite_id,
            dependent_name: parts.dependent_name,
            prerequisite_name: parts.prerequisite_name,
            description: parts.description,
            occurred_at: clock.utc(),
        }
    }

    /// Returns the project the change happened in.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the user who made the change.
    #[must_use]
    pub const fn actor(&self) -> &ActorName {
        &self.actor
    }

    /// Returns the kind of change.
    #[must_use]
    pub const fn kind(&self) -> DependencyActivityKind {
        self.kind
    }

    /// Returns the recorded entity type.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Returns the blocked task.
    #[must_use]
    pub const fn dependent_id(&self) -> TaskId {
        self.dependent_id
    }

    /// Returns the prerequisite task.
    #[must_use]
    pub const fn prerequisite_id(&self) -> TaskId {
        self.prerequisite_id
    }

    /// Returns the blocked task's display name.
    #[must_use]
    pub fn dependent_name(&self) -> &str {
        &self.dependent_name
    }

    /// Returns the prerequisite task's display name.
    #[must_use]
    pub fn prerequisite_name(&self) -> &str {
        &self.prerequisite_name
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns when the change was recorded.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

struct ActivityParts {
    project_id: ProjectId,
    actor: ActorName,
    dependent_id: TaskId,
    prerequisite_id: TaskId,
    dependent_name: String,
    prerequisite_name: String,
    description: String,
}
