//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the train persistence contract used by the service layer.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every implementation validates records before writing them.
//! - Identifier uniqueness is owned by the store, never by callers.

pub mod memory_repo;
pub mod train_repo;
