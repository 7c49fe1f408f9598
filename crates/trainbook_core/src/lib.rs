//! Core domain logic for the train booking catalogue.
//! Callers go through `TrainService`; storage stays behind `TrainRepository`.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::train::{Train, TrainId, TrainValidationError};
pub use repo::memory_repo::InMemoryTrainRepository;
pub use repo::train_repo::{RepoError, RepoResult, SqliteTrainRepository, TrainRepository};
pub use service::train_service::{TrainService, TrainServiceError, TrainServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
