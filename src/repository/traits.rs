//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;

use crate::domain::{Entity, StoreResult};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: &T) -> StoreResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: &T::Id) -> StoreResult<Option<T>>;

    /// List all entities in natural storage order
    async fn list(&self) -> StoreResult<Vec<T>>;

    /// Update an existing entity, reporting whether a row matched
    async fn update(&self, entity: &T) -> StoreResult<bool>;

    /// Delete entity by ID, reporting whether a row matched
    async fn delete(&self, id: &T::Id) -> StoreResult<bool>;
}
