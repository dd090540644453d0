//! Error types for dependency domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing domain dependency values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DependencyDomainError {
    /// A task was named as its own prerequisite.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// The actor name is empty after trimming.
    #[error("actor name must not be empty")]
    EmptyActor,
}

/// Error returned while parsing activity kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown dependency activity kind: {0}")]
pub struct ParseActivityKindError(pub String);
