//! Activity Store
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - store: Consumer-facing persistence/query service
//!
//! The UI layer holds no durable references: it calls into
//! [`ActivityItemStore`] and renders whatever the store hands back.

mod domain;
mod repository;
mod store;

pub use domain::{ActivityItem, ActivityItemPatch, Entity, NewActivityItem, StoreError, StoreResult};
pub use repository::{init_db, ActivityItemRepository, Migration, Repository, MIGRATIONS};
pub use store::ActivityItemStore;
