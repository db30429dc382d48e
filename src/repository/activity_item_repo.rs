//! Activity Item Repository
//!
//! SQLite-backed implementation of the Repository trait for ActivityItem.
//! Every statement goes through a shared connection behind an async mutex,
//! so cloned handles never interleave statements.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use super::traits::Repository;
use crate::domain::{ActivityItem, StoreError, StoreResult};

const COLUMNS: &str = "id, type, title, completed, completedAt, createdAt, priority, tags";

/// SQLite implementation of the ActivityItem repository
#[derive(Clone)]
pub struct ActivityItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActivityItemRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Remove every record
    pub async fn clear_all(&self) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM activity_items", [])
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl Repository<ActivityItem> for ActivityItemRepository {
    async fn create(&self, entity: &ActivityItem) -> StoreResult<ActivityItem> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO activity_items (id, type, title, completed, completedAt, createdAt, priority, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entity.id,
                entity.item_type,
                entity.title,
                if entity.completed { 1 } else { 0 },
                entity.completed_at.map(|t| t.to_rfc3339()),
                entity.created_at.to_rfc3339(),
                entity.priority,
                entity.tags,
            ],
        )
        .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &String) -> StoreResult<Option<ActivityItem>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {} FROM activity_items WHERE id = ?1", COLUMNS),
            params![id],
            row_to_item,
        )
        .optional()
        .map_err(|e| StoreError::Read(e.to_string()))
    }

    async fn list(&self) -> StoreResult<Vec<ActivityItem>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM activity_items", COLUMNS))
            .map_err(|e| StoreError::Read(e.to_string()))?;
        let items = stmt
            .query_map([], row_to_item)
            .map_err(|e| StoreError::Read(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(items)
    }

    async fn update(&self, entity: &ActivityItem) -> StoreResult<bool> {
        // id and createdAt never appear in the SET list
        let conn = self.conn.lock().await;
        let rows = conn
            .execute(
                "UPDATE activity_items SET type = ?1, title = ?2, completed = ?3, completedAt = ?4, priority = ?5, tags = ?6 WHERE id = ?7",
                params![
                    entity.item_type,
                    entity.title,
                    if entity.completed { 1 } else { 0 },
                    entity.completed_at.map(|t| t.to_rfc3339()),
                    entity.priority,
                    entity.tags,
                    entity.id,
                ],
            )
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(rows > 0)
    }

    async fn delete(&self, id: &String) -> StoreResult<bool> {
        let conn = self.conn.lock().await;
        let rows = conn
            .execute("DELETE FROM activity_items WHERE id = ?1", params![id])
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(rows > 0)
    }
}

/// Convert a database row to ActivityItem
fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ActivityItem> {
    let completed: i32 = row.get(3)?;
    let completed_at: Option<String> = row.get(4)?;
    let created_at: String = row.get(5)?;
    Ok(ActivityItem {
        id: row.get(0)?,
        item_type: row.get(1)?,
        title: row.get(2)?,
        completed: completed != 0,
        completed_at: completed_at.as_deref().and_then(parse_timestamp),
        created_at: parse_timestamp(&created_at).unwrap_or_else(Utc::now),
        priority: row.get(6)?,
        tags: row.get(7)?,
    })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
