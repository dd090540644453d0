//! Dependency edge entity and its endpoint pair.

use super::{DependencyDomainError, DependencyId, ProjectId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered endpoint pair of a dependency edge.
///
/// The dependent task is blocked until the prerequisite task is complete.
/// Construction rejects self-loops, so every value of this type satisfies
/// `dependent != prerequisite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyEdge {
    dependent_id: TaskId,
    prerequisite_id: TaskId,
}

impl DependencyEdge {
    /// Creates a validated edge.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyDomainError::SelfDependency`] when both endpoints
    /// are the same task.
    pub fn new(
        dependent_id: TaskId,
        prerequisite_id: TaskId,
    ) -> Result<Self, DependencyDomainError> {
        if dependent_id == prerequisite_id {
            return Err(DependencyDomainError::SelfDependency(dependent_id));
        }
        Ok(Self {
            dependent_id,
            prerequisite_id,
        })
    }

    /// Returns the blocked task.
    #[must_use]
    pub const fn dependent_id(self) -> TaskId {
        self.dependent_id
    }

    /// Returns the task that must finish first.
    #[must_use]
    pub const fn prerequisite_id(self) -> TaskId {
        self.prerequisite_id
    }

    /// Returns the same pair with its direction flipped.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            dependent_id: self.prerequisite_id,
            prerequisite_id: self.dependent_id,
        }
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.dependent_id, self.prerequisite_id)
    }
}

/// A stored "must-finish-before" relationship between two tasks of one
/// project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedDependencyData")]
pub struct Dependency {
    id: DependencyId,
    project_id: ProjectId,
    dependent_id: TaskId,
    prerequisite_id: TaskId,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted dependency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistedDependencyData {
    /// Persisted surrogate key.
    pub id: DependencyId,
    /// Project shared by both endpoints.
    pub project_id: ProjectId,
    /// Blocked task.
    pub dependent_id: TaskId,
    /// Task that must finish first.
    pub prerequisite_id: TaskId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Dependency {
    /// Creates a new dependency inside `project_id`.
    #[must_use]
    pub fn new(project_id: ProjectId, edge: DependencyEdge, clock: &impl Clock) -> Self {
        Self {
            id: DependencyId::new(),
            project_id,
            dependent_id: edge.dependent_id(),
            prerequisite_id: edge.prerequisite_id(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a dependency from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyDomainError::SelfDependency`] when the stored row
    /// is a self-loop.
    pub fn from_persisted(data: PersistedDependencyData) -> Result<Self, DependencyDomainError> {
        let edge = DependencyEdge::new(data.dependent_id, data.prerequisite_id)?;
        Ok(Self {
            id: data.id,
            project_id: data.project_id,
            dependent_id: edge.dependent_id(),
            prerequisite_id: edge.prerequisite_id(),
            created_at: data.created_at,
        })
    }

    /// Returns the dependency identifier.
    #[must_use]
    pub const fn id(&self) -> DependencyId {
        self.id
    }

    /// Returns the project both endpoints belong to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the blocked task.
    #[must_use]
    pub const fn dependent_id(&self) -> TaskId {
        self.dependent_id
    }

    /// Returns the task that must finish first.
    #[must_use]
    pub const fn prerequisite_id(&self) -> TaskId {
        self.prerequisite_id
    }

    /// Returns the endpoint pair.
    #[must_use]
    pub const fn edge(&self) -> DependencyEdge {
        DependencyEdge {
            dependent_id: self.dependent_id,
            prerequisite_id: self.prerequisite_id,
        }
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl TryFrom<PersistedDependencyData> for Dependency {
    type Error = DependencyDomainError;

    fn try_from(data: PersistedDependencyData) -> Result<Self, Self::Error> {
        Self::from_persisted(data)
    }
}
