//! Diesel schema for dependency edge persistence.

diesel::table! {
    /// Directed "must-finish-before" edges between tasks of one project.
    task_dependencies (id) {
        /// Surrogate key.
        id -> Uuid,
        /// Project shared by both endpoints.
        project_id -> Uuid,
        /// Blocked task.
        dependent_id -> Uuid,
        /// Task that must finish first.
        prerequisite_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
