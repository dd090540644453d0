//! Diesel row models for dependency persistence.

use super::schema::task_dependencies;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for dependency records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_dependencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DependencyRow {
    /// Surrogate key.
    pub id: uuid::Uuid,
    /// Project shared by both endpoints.
    pub project_id: uuid::Uuid,
    /// Blocked task.
    pub dependent_id: uuid::Uuid,
    /// Task that must finish first.
    pub prerequisite_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for dependency records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_dependencies)]
pub struct NewDependencyRow {
    /// Surrogate key.
    pub id: uuid::Uuid,
    /// Project shared by both endpoints.
    pub project_id: uuid::Uuid,
    /// Blocked task.
    pub dependent_id: uuid::Uuid,
    /// Task that must finish first.
    pub prerequisite_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Result row of the commit-time reachability probe.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct CycleProbeRow {
    /// Whether the prerequisite already reaches the dependent.
    #[diesel(sql_type = diesel::sql_types::Bool)]
    pub closes_cycle: bool,
}
