//! Domain model for the train catalogue.
//!
//! # Responsibility
//! - Define canonical data structures used by repositories and services.
//!
//! # Invariants
//! - Every persisted train is identified by a store-assigned `TrainId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod train;
