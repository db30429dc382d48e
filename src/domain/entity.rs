//! Domain Layer - Core Entity Trait
//!
//! The basic contract for domain entities, plus the error channel every
//! storage operation reports through.

use serde::{Deserialize, Serialize};

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Common result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level errors
///
/// A missing record is not an error: `update`/`delete` on an unknown id
/// report a soft no-effect result instead. None of these are retried
/// automatically; the caller decides whether to re-invoke the operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreError {
    /// A schema migration step failed at startup; the store is
    /// non-operational.
    Migration(String),
    /// A read against durable storage failed. The in-memory mirror keeps
    /// its previous contents.
    Read(String),
    /// A write against durable storage failed. Single-row writes are
    /// atomic, so no partial record is left behind.
    Write(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Migration(msg) => write!(f, "Migration failed: {}", msg),
            StoreError::Read(msg) => write!(f, "Storage read failed: {}", msg),
            StoreError::Write(msg) => write!(f, "Storage write failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
