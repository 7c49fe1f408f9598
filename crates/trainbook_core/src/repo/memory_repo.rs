//! In-memory train repository.
//!
//! Substitutable for `SqliteTrainRepository` wherever a throwaway store is
//! enough (service wiring tests, demos). Ids are assigned from a counter that
//! starts at 1 and never reuses a value; once the counter passes `i64::MAX`
//! inserts without an id fail instead of wrapping.

use crate::model::train::{Train, TrainId};
use crate::repo::train_repo::{RepoError, RepoResult, TrainRepository};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct MemoryState {
    trains: BTreeMap<TrainId, Train>,
    /// `None` once the id space is exhausted.
    next_id: Option<TrainId>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            trains: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

impl MemoryState {
    fn allocate_id(&self) -> RepoResult<TrainId> {
        let id = self
            .next_id
            .ok_or_else(|| RepoError::Unavailable("train id space exhausted".to_string()))?;
        if self.trains.contains_key(&id) {
            return Err(RepoError::Unavailable(format!(
                "generated train id {id} is already in use"
            )));
        }
        Ok(id)
    }
}

/// Thread-safe in-memory implementation of `TrainRepository`.
#[derive(Debug, Default)]
pub struct InMemoryTrainRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryTrainRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored trains.
    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.read()?.trains.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.read()?.trains.is_empty())
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| RepoError::Unavailable("failed to acquire read lock".to_string()))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| RepoError::Unavailable("failed to acquire write lock".to_string()))
    }
}

impl TrainRepository for InMemoryTrainRepository {
    fn find_all(&self) -> RepoResult<Vec<Train>> {
        Ok(self.read()?.trains.values().cloned().collect())
    }

    fn find_by_id(&self, id: TrainId) -> RepoResult<Option<Train>> {
        Ok(self.read()?.trains.get(&id).cloned())
    }

    fn save(&self, train: &Train) -> RepoResult<Train> {
        train.validate()?;

        let mut state = self.write()?;
        let id = match train.id {
            Some(id) => id,
            None => state.allocate_id()?,
        };
        state.next_id = match (state.next_id, id.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };

        let persisted = Train {
            id: Some(id),
            ..train.clone()
        };
        state.trains.insert(id, persisted.clone());
        Ok(persisted)
    }

    fn delete_by_id(&self, id: TrainId) -> RepoResult<()> {
        self.write()?.trains.remove(&id);
        Ok(())
    }
}
