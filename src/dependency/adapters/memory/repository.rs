//! In-memory dependency edge store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dependency::{
    domain::{Dependency, DependencyEdge, DependencyId, ProjectId, TaskId},
    ports::{DependencyRepository, DependencyRepositoryError, DependencyRepositoryResult},
};

/// Thread-safe in-memory dependency repository.
///
/// Edges are keyed by identifier and indexed by pair, dependent, and
/// prerequisite. Each per-task index keeps insertion order, which doubles as
/// creation order for lookups.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDependencyRepository {
    state: Arc<RwLock<InMemoryDependencyState>>,
}

#[derive(Debug)]
struct StoredDependency {
    sequence: u64,
    dependency: Dependency,
}

#[derive(Debug, Default)]
struct InMemoryDependencyState {
    next_sequence: u64,
    edges: HashMap<DependencyId, StoredDependency>,
    pair_index: HashMap<DependencyEdge, DependencyId>,
    by_dependent: HashMap<TaskId, Vec<DependencyId>>,
    by_prerequisite: HashMap<TaskId, Vec<DependencyId>>,
    project_counts: HashMap<ProjectId, usize>,
}

impl InMemoryDependencyState {
    fn resolve(&self, ids: Option<&[DependencyId]>) -> Vec<Dependency> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id))
            .map(|stored| stored.dependency.clone())
            .collect()
    }
}

fn unlink(index: &mut HashMap<TaskId, Vec<DependencyId>>, task_id: TaskId, id: DependencyId) {
    if let Some(ids) = index.get_mut(&task_id) {
        ids.retain(|candidate| *candidate != id);
        if ids.is_empty() {
            index.remove(&task_id);
        }
    }
}

impl InMemoryDependencyRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored edge in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyRepositoryError::Persistence`] when the state lock
    /// is poisoned.
    pub fn snapshot(&self) -> DependencyRepositoryResult<Vec<Dependency>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut stored: Vec<&StoredDependency> = state.edges.values().collect();
        stored.sort_by_key(|entry| entry.sequence);
        Ok(stored
            .into_iter()
            .map(|entry| entry.dependency.clone())
            .collect())
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> DependencyRepositoryError {
    DependencyRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DependencyRepository for InMemoryDependencyRepository {
    async fn insert(&self, dependency: &Dependency) -> DependencyRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let edge = dependency.edge();
        if state.pair_index.contains_key(&edge) {
            return Err(DependencyRepositoryError::DuplicateEdge(edge));
        }

        let id = dependency.id();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.edges.insert(
            id,
            StoredDependency {
                sequence,
                dependency: dependency.clone(),
            },
        );
        state.pair_index.insert(edge, id);
        state
            .by_dependent
            .entry(edge.dependent_id())
            .or_default()
            .push(id);
        state
            .by_prerequisite
            .entry(edge.prerequisite_id())
            .or_default()
            .push(id);
        *state
            .project_counts
            .entry(dependency.project_id())
            .or_default() += 1;
        Ok(())
    }

    async fn delete_by_pair(&self, edge: DependencyEdge) -> DependencyRepositoryResult<Dependency> {
        let mut state = self.state.write().map_err(poisoned)?;
        let id = state
            .pair_index
            .remove(&edge)
            .ok_or(DependencyRepositoryError::NotFound(edge))?;
        let removed = state
            .edges
            .remove(&id)
            .map(|stored| stored.dependency)
            .ok_or(DependencyRepositoryError::NotFound(edge))?;

        unlink(&mut state.by_dependent, edge.dependent_id(), id);
        unlink(&mut state.by_prerequisite, edge.prerequisite_id(), id);
        if let Some(count) = state.project_counts.get_mut(&removed.project_id()) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                state.project_counts.remove(&removed.project_id());
            }
        }
        Ok(removed)
    }

    async fn find_by_pair(
        &self,
        edge: DependencyEdge,
    ) -> DependencyRepositoryResult<Option<Dependency>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .pair_index
            .get(&edge)
            .and_then(|id| state.edges.get(id))
            .map(|stored| stored.dependency.clone()))
    }

    async fn exists(&self, edge: DependencyEdge) -> DependencyRepositoryResult<bool> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.pair_index.contains_key(&edge))
    }

    async fn find_prerequisites_of(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<Dependency>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.resolve(state.by_dependent.get(&task_id).map(Vec::as_slice)))
    }

    async fn find_dependents_of(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<Dependency>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.resolve(state.by_prerequisite.get(&task_id).map(Vec::as_slice)))
    }

    async fn count_in_project(&self, project_id: ProjectId) -> DependencyRepositoryResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.project_counts.get(&project_id).copied().unwrap_or_default())
    }
}
