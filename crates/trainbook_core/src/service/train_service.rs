//! Train use-case service.
//!
//! # Responsibility
//! - Provide the CRUD entry points callers use for trains.
//! - Delegate persistence to a `TrainRepository` implementation.
//!
//! # Invariants
//! - The service holds no state besides its repository.
//! - `update_train` never calls `save` for an id that does not exist.
//! - Repository failures are propagated unchanged.

use crate::model::train::{Train, TrainId};
use crate::repo::train_repo::{RepoError, TrainRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TrainServiceResult<T> = Result<T, TrainServiceError>;

/// Errors from train service operations.
#[derive(Debug)]
pub enum TrainServiceError {
    /// No train is stored under the requested id.
    NotFound(TrainId),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for TrainServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "train not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TrainServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TrainServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper for train CRUD operations.
pub struct TrainService<R: TrainRepository> {
    repo: R,
}

impl<R: TrainRepository> TrainService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every stored train.
    pub fn get_all_trains(&self) -> TrainServiceResult<Vec<Train>> {
        Ok(self.repo.find_all()?)
    }

    /// Gets one train by id. Absence is `Ok(None)`, not an error.
    pub fn get_train_by_id(&self, id: TrainId) -> TrainServiceResult<Option<Train>> {
        Ok(self.repo.find_by_id(id)?)
    }

    /// Persists a new train and returns the stored representation.
    ///
    /// The input is handed to the repository as-is; the store assigns the id.
    pub fn create_train(&self, train: &Train) -> TrainServiceResult<Train> {
        let created = self.repo.save(train)?;
        info!(
            "event=train_create module=service status=ok id={}",
            created.id.map_or_else(|| "none".to_string(), |id| id.to_string())
        );
        Ok(created)
    }

    /// Overwrites an existing train with the fields of `replacement`.
    ///
    /// # Contract
    /// - Looks the record up first; fails with `NotFound` without saving
    ///   when it does not exist.
    /// - Copies every field but `id` from `replacement` onto the found
    ///   record and saves that record, so the stored identity is kept.
    /// - Returns whatever the repository returns from `save`.
    pub fn update_train(&self, id: TrainId, replacement: &Train) -> TrainServiceResult<Train> {
        let Some(mut existing) = self.repo.find_by_id(id)? else {
            warn!("event=train_update module=service status=not_found id={id}");
            return Err(TrainServiceError::NotFound(id));
        };

        existing.overwrite_from(replacement);
        let updated = self.repo.save(&existing)?;
        info!("event=train_update module=service status=ok id={id}");
        Ok(updated)
    }

    /// Deletes a train by id. Deleting a missing id is not distinguished.
    pub fn delete_train(&self, id: TrainId) -> TrainServiceResult<()> {
        self.repo.delete_by_id(id)?;
        info!("event=train_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Lists trains whose name, source or destination contains `term`,
    /// ignoring case. A blank term matches every train.
    pub fn search_trains(&self, term: &str) -> TrainServiceResult<Vec<Train>> {
        let needle = term.trim().to_lowercase();
        let trains = self.repo.find_all()?;
        if needle.is_empty() {
            return Ok(trains);
        }

        Ok(trains
            .into_iter()
            .filter(|train| train.matches_lowercase(&needle))
            .collect())
    }
}
