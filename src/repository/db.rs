//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::domain::{StoreError, StoreResult};

/// A single schema-change step
///
/// Steps are append-only and idempotent: reapplying a satisfied step is a
/// no-op, so a database at any earlier version can always be brought
/// forward by replaying the list.
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub apply: fn(&Connection) -> rusqlite::Result<()>,
}

/// Ordered migration list, applied once at startup
pub static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_activity_items",
        apply: create_activity_items,
    },
    Migration {
        version: 2,
        name: "add_priority_and_tags",
        apply: add_priority_and_tags,
    },
];

fn create_activity_items(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS activity_items (
            id TEXT PRIMARY KEY,
            type TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL DEFAULT '',
            completed INTEGER NOT NULL DEFAULT 0,
            completedAt TEXT,
            createdAt TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn add_priority_and_tags(conn: &Connection) -> rusqlite::Result<()> {
    if !column_exists(conn, "activity_items", "priority")? {
        conn.execute(
            "ALTER TABLE activity_items ADD COLUMN priority INTEGER NOT NULL DEFAULT 0",
            [],
        )?;
    }
    if !column_exists(conn, "activity_items", "tags")? {
        conn.execute(
            "ALTER TABLE activity_items ADD COLUMN tags TEXT NOT NULL DEFAULT ''",
            [],
        )?;
    }
    Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Open a database and bring its schema up to date
///
/// `None` opens an in-memory database (tests, previews). Fails with
/// `StoreError::Migration` if any step errors; no connection is handed out
/// in that case.
pub async fn init_db(path: Option<&Path>) -> StoreResult<Arc<Mutex<Connection>>> {
    let path: Option<PathBuf> = path.map(Path::to_path_buf);
    let conn = tokio::task::spawn_blocking(move || -> StoreResult<Connection> {
        let conn = match &path {
            Some(p) => Connection::open(p),
            None => Connection::open_in_memory(),
        }
        .map_err(|e| StoreError::Migration(format!("Failed to open database: {}", e)))?;

        run_migrations(&conn)?;
        Ok(conn)
    })
    .await
    .map_err(|e| StoreError::Migration(format!("Database init task failed: {}", e)))??;

    Ok(Arc::new(Mutex::new(conn)))
}

/// Apply all pending migrations in order
///
/// Progress is tracked in `PRAGMA user_version`, so a fully migrated
/// database skips every step.
fn run_migrations(conn: &Connection) -> StoreResult<()> {
    let current: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StoreError::Migration(format!("Failed to read schema version: {}", e)))?;

    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }
        log::info!(
            "applying migration {} ({})",
            migration.version,
            migration.name
        );
        (migration.apply)(conn).map_err(|e| {
            StoreError::Migration(format!(
                "Migration {} ({}) failed: {}",
                migration.version, migration.name, e
            ))
        })?;
        conn.pragma_update(None, "user_version", migration.version)
            .map_err(|e| {
                StoreError::Migration(format!(
                    "Failed to record schema version {}: {}",
                    migration.version, e
                ))
            })?;
    }

    Ok(())
}
