//! Per-project write serialization.

use crate::dependency::domain::ProjectId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Idle lock entries are pruned once the table grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// Table of per-project mutexes guarding validate-then-commit sequences.
///
/// Mutations of different projects proceed in parallel; mutations of the same
/// project run one at a time.
#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: Mutex<HashMap<ProjectId, Arc<AsyncMutex<()>>>>,
}

/// Held while a project's edge set is being validated and changed.
#[derive(Debug)]
#[must_use = "the project lock is released as soon as the guard is dropped"]
pub struct ProjectGuard {
    project_id: ProjectId,
    _guard: OwnedMutexGuard<()>,
}

impl ProjectGuard {
    /// Returns the locked project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl ProjectLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `project_id`'s edge set.
    pub async fn acquire(&self, project_id: ProjectId) -> ProjectGuard {
        let lock = {
            // The table only holds `Arc`s, so a poisoned guard is still usable.
            let mut table = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            if table.len() > PRUNE_THRESHOLD {
                table.retain(|_, entry| Arc::strong_count(entry) > 1);
            }
            Arc::clone(table.entry(project_id).or_default())
        };
        ProjectGuard {
            project_id,
            _guard: lock.lock_owned().await,
        }
    }

    /// Returns the number of projects with a lock entry.
    #[must_use]
    pub fn tracked_projects(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
