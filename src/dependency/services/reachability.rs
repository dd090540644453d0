//! Bounded path search over the committed dependency edges.

use crate::dependency::{
    domain::{DependencyEdge, TaskId},
    ports::{DependencyRepositoryError, EdgeQuery},
};
use std::collections::HashSet;
use thiserror::Error;

/// Errors returned by reachability searches.
#[derive(Debug, Clone, Error)]
pub enum ReachabilityError {
    /// The search visited more distinct tasks than allowed.
    #[error("reachability search exceeded {limit} visited tasks")]
    GraphTooLarge {
        /// Configured traversal bound.
        limit: usize,
    },
    /// Reading edges failed.
    #[error(transparent)]
    Query(#[from] DependencyRepositoryError),
}

/// Answers "is there a directed path from A to B?" over prerequisite edges.
///
/// The checker is a pure predicate: it only reads through [`EdgeQuery`] and
/// keeps no state between calls.
///
/// # Examples
///
/// ```
/// use boardgraph::dependency::services::ReachabilityChecker;
///
/// let checker = ReachabilityChecker::new(500);
/// assert_eq!(checker.max_visited_nodes(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachabilityChecker {
    max_visited_nodes: usize,
}

impl ReachabilityChecker {
    /// Creates a checker that fails closed after visiting
    /// `max_visited_nodes` distinct tasks.
    #[must_use]
    pub const fn new(max_visited_nodes: usize) -> Self {
        Self { max_visited_nodes }
    }

    /// Returns the traversal bound.
    #[must_use]
    pub const fn max_visited_nodes(self) -> usize {
        self.max_visited_nodes
    }

    /// Returns whether `to` is reachable from `from` by following direct
    /// prerequisites.
    ///
    /// A task trivially reaches itself.
    ///
    /// # Errors
    ///
    /// Returns [`ReachabilityError::GraphTooLarge`] when the search visits
    /// more than the configured number of tasks, or
    /// [`ReachabilityError::Query`] when reading edges fails.
    pub async fn has_path<Q>(
        &self,
        edges: &Q,
        from: TaskId,
        to: TaskId,
    ) -> Result<bool, ReachabilityError>
    where
        Q: EdgeQuery + ?Sized,
    {
        if from == to {
            return Ok(true);
        }

        let mut visited = HashSet::from([from]);
        let mut pending = vec![from];
        while let Some(task_id) = pending.pop() {
            for next in edges.direct_prerequisites(task_id).await? {
                if next == to {
                    return Ok(true);
                }
                if !visited.insert(next) {
                    continue;
                }
                if visited.len() > self.max_visited_nodes {
                    return Err(ReachabilityError::GraphTooLarge {
                        limit: self.max_visited_nodes,
                    });
                }
                pending.push(next);
            }
        }
        Ok(false)
    }

    /// Returns whether adding `edge` would close a cycle, i.e. whether its
    /// dependent is already a transitive prerequisite of its prerequisite.
    ///
    /// # Errors
    ///
    /// See [`ReachabilityChecker::has_path`].
    pub async fn creates_cycle<Q>(
        &self,
        edges: &Q,
        edge: DependencyEdge,
    ) -> Result<bool, ReachabilityError>
    where
        Q: EdgeQuery + ?Sized,
    {
        self.has_path(edges, edge.prerequisite_id(), edge.dependent_id())
            .await
    }
}
