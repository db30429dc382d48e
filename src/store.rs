//! Activity Item Store
//!
//! The consumer-facing persistence service. It owns the repository handle
//! and an in-memory mirror of the full record set: every mutation writes
//! to durable storage first, then reloads the mirror wholesale.
//!
//! Cache contract: the mirror reflects the store's own writes as of the
//! last completed operation (read-after-own-write). Writes from any other
//! process touching the same file are not a supported scenario.

use std::path::Path;

use chrono::Utc;

use crate::domain::{ActivityItem, ActivityItemPatch, NewActivityItem, StoreError, StoreResult};
use crate::repository::{init_db, ActivityItemRepository, Repository};

/// Persistence/query service for activity items
///
/// Mutating operations take `&mut self`, so one instance never races
/// against itself; consumers sharing a store across tasks wrap it in a
/// `tokio::sync::Mutex`.
pub struct ActivityItemStore {
    repo: ActivityItemRepository,
    items: Vec<ActivityItem>,
}

impl ActivityItemStore {
    /// Open (or create) the database at `path` and apply pending
    /// migrations
    ///
    /// Fails with `StoreError::Migration` and yields no store when a
    /// migration step errors. The mirror starts empty; the first
    /// [`refresh`](Self::refresh) populates it.
    pub async fn initialize(path: &Path) -> StoreResult<Self> {
        let conn = init_db(Some(path)).await?;
        Ok(Self::with_repository(ActivityItemRepository::new(conn)))
    }

    /// In-memory store, for tests and previews
    pub async fn initialize_in_memory() -> StoreResult<Self> {
        let conn = init_db(None).await?;
        Ok(Self::with_repository(ActivityItemRepository::new(conn)))
    }

    /// Build a store around an already-initialized repository
    pub fn with_repository(repo: ActivityItemRepository) -> Self {
        Self {
            repo,
            items: Vec::new(),
        }
    }

    /// Reload the mirror from durable storage, replacing it wholesale
    ///
    /// Records come back in natural storage order. On failure the mirror
    /// keeps its previous contents.
    pub async fn refresh(&mut self) -> StoreResult<()> {
        let items = self.repo.list().await?;
        self.items = items;
        Ok(())
    }

    /// Create a new item from a draft
    ///
    /// Generates the id, stamps `createdAt`, writes the record, refreshes
    /// the mirror and returns the record as re-read from storage.
    pub async fn create(&mut self, draft: NewActivityItem) -> StoreResult<ActivityItem> {
        let id = generate_id();
        let item = ActivityItem::from_draft(id.clone(), Utc::now(), draft);
        self.repo.create(&item).await?;
        log::debug!("created activity item {}", id);
        self.refresh().await?;
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| StoreError::Read(format!("item {} missing after insert", id)))
    }

    /// Apply a partial patch to the item matching `id`
    ///
    /// Returns `Ok(None)` without touching storage or the mirror when the
    /// id is unknown. Completion pairing is handled during the merge:
    /// flipping `completed` without an explicit `completedAt` stamps or
    /// clears the timestamp (see [`ActivityItem::apply_patch`]).
    pub async fn update(
        &mut self,
        id: &str,
        patch: ActivityItemPatch,
    ) -> StoreResult<Option<ActivityItem>> {
        let existing = match self.repo.find_by_id(&id.to_string()).await? {
            Some(item) => item,
            None => return Ok(None),
        };
        let merged = existing.apply_patch(patch, Utc::now());
        if !self.repo.update(&merged).await? {
            // row vanished between the lookup and the write
            return Ok(None);
        }
        self.refresh().await?;
        self.repo.find_by_id(&merged.id).await
    }

    /// Remove the item matching `id`
    ///
    /// Returns `Ok(false)` when the id is unknown; the mirror and the
    /// store are left untouched in that case.
    pub async fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let removed = self.repo.delete(&id.to_string()).await?;
        if removed {
            log::debug!("deleted activity item {}", id);
            self.refresh().await?;
        }
        Ok(removed)
    }

    /// Point lookup against durable storage (not the mirror)
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<ActivityItem>> {
        self.repo.find_by_id(&id.to_string()).await
    }

    /// Remove every record. Irreversible.
    pub async fn clear_all(&mut self) -> StoreResult<()> {
        self.repo.clear_all().await?;
        log::debug!("cleared all activity items");
        self.refresh().await
    }

    // Mirror-only queries. These never touch durable storage: they read
    // the snapshot captured by the last successful refresh.

    /// Full mirror snapshot, in storage order
    pub fn items(&self) -> &[ActivityItem] {
        &self.items
    }

    /// Items whose type equals `item_type`
    pub fn items_by_type(&self, item_type: &str) -> Vec<ActivityItem> {
        self.items
            .iter()
            .filter(|i| i.item_type == item_type)
            .cloned()
            .collect()
    }

    /// Completed items
    pub fn completed_items(&self) -> Vec<ActivityItem> {
        self.items.iter().filter(|i| i.completed).cloned().collect()
    }

    /// Incomplete items
    pub fn incomplete_items(&self) -> Vec<ActivityItem> {
        self.items.iter().filter(|i| !i.completed).cloned().collect()
    }

    /// Items with the given priority
    pub fn items_by_priority(&self, priority: i32) -> Vec<ActivityItem> {
        self.items
            .iter()
            .filter(|i| i.priority == priority)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over titles
    pub fn search_by_title(&self, term: &str) -> Vec<ActivityItem> {
        let term = term.to_lowercase();
        self.items
            .iter()
            .filter(|i| i.title.to_lowercase().contains(&term))
            .cloned()
            .collect()
    }
}

/// Generate a unique item id: millisecond timestamp plus a random suffix
fn generate_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..9])
}
