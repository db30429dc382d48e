//! Activity Item Entity
//!
//! The single record type managed by the store: a task or note with a
//! completion flag, a priority hint and a comma-joined tag list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A stored task/note record
///
/// Serialized with camelCase keys (`createdAt`, `completedAt`, `type`) so
/// the wire shape matches what a JS-side consumer expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    /// Unique identifier, generated by the store, never user-supplied
    pub id: String,
    /// Free-form category tag (e.g. "task", "note")
    #[serde(rename = "type")]
    pub item_type: String,
    /// Display label
    pub title: String,
    /// Completion status
    pub completed: bool,
    /// Set when `completed` transitions to true, cleared on the way back
    pub completed_at: Option<DateTime<Utc>>,
    /// Stamped once at creation, immutable afterwards
    pub created_at: DateTime<Utc>,
    /// Ordering hint, no enforced range
    pub priority: i32,
    /// Comma-joined tag list
    pub tags: String,
}

/// Creation input: every attribute except the generated `id` and
/// `created_at`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivityItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub title: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub priority: i32,
    pub tags: String,
}

/// Partial update for an existing item
///
/// `None` leaves a field untouched. `completed_at` is doubly optional:
/// `Some(None)` clears the timestamp, `Some(Some(t))` sets it explicitly.
#[derive(Debug, Clone, Default)]
pub struct ActivityItemPatch {
    pub item_type: Option<String>,
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub priority: Option<i32>,
    pub tags: Option<String>,
}

impl ActivityItem {
    /// Materialize a draft into a full record
    pub fn from_draft(id: String, created_at: DateTime<Utc>, draft: NewActivityItem) -> Self {
        Self {
            id,
            item_type: draft.item_type,
            title: draft.title,
            completed: draft.completed,
            completed_at: draft.completed_at,
            created_at,
            priority: draft.priority,
            tags: draft.tags,
        }
    }

    /// Apply a partial patch, returning the merged record
    ///
    /// `id` and `created_at` are never touched. When the patch flips
    /// `completed` without carrying an explicit `completed_at`, the
    /// timestamp is stamped with `now` (incomplete -> complete) or cleared
    /// (complete -> incomplete). An explicit `completed_at` in the patch
    /// always wins.
    pub fn apply_patch(&self, patch: ActivityItemPatch, now: DateTime<Utc>) -> Self {
        let mut item = self.clone();
        if let Some(item_type) = patch.item_type {
            item.item_type = item_type;
        }
        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(priority) = patch.priority {
            item.priority = priority;
        }
        if let Some(tags) = patch.tags {
            item.tags = tags;
        }
        if let Some(completed) = patch.completed {
            if completed != item.completed && patch.completed_at.is_none() {
                item.completed_at = if completed { Some(now) } else { None };
            }
            item.completed = completed;
        }
        if let Some(completed_at) = patch.completed_at {
            item.completed_at = completed_at;
        }
        item
    }
}

impl Entity for ActivityItem {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ActivityItem {
        ActivityItem::from_draft(
            "1754000000000-abc123def".to_string(),
            Utc::now(),
            NewActivityItem {
                item_type: "task".to_string(),
                title: "Buy milk".to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_draft_materialization() {
        let item = sample();
        assert_eq!(item.id(), "1754000000000-abc123def");
        assert_eq!(item.item_type, "task");
        assert!(!item.completed);
        assert!(item.completed_at.is_none());
        assert_eq!(item.priority, 0);
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let item = sample();
        let merged = item.apply_patch(ActivityItemPatch::default(), Utc::now());
        assert_eq!(merged, item);
    }

    #[test]
    fn test_completing_stamps_timestamp() {
        let item = sample();
        let now = Utc::now();
        let merged = item.apply_patch(
            ActivityItemPatch {
                completed: Some(true),
                ..Default::default()
            },
            now,
        );
        assert!(merged.completed);
        assert_eq!(merged.completed_at, Some(now));
    }

    #[test]
    fn test_reverting_clears_timestamp() {
        let now = Utc::now();
        let mut item = sample();
        item.completed = true;
        item.completed_at = Some(now);
        let merged = item.apply_patch(
            ActivityItemPatch {
                completed: Some(false),
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(!merged.completed);
        assert!(merged.completed_at.is_none());
    }

    #[test]
    fn test_no_restamp_without_transition() {
        let original = Utc::now() - chrono::Duration::hours(1);
        let mut item = sample();
        item.completed = true;
        item.completed_at = Some(original);
        let merged = item.apply_patch(
            ActivityItemPatch {
                completed: Some(true),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(merged.completed_at, Some(original));
    }

    #[test]
    fn test_explicit_completed_at_wins() {
        let explicit = Utc::now() - chrono::Duration::minutes(5);
        let item = sample();
        let merged = item.apply_patch(
            ActivityItemPatch {
                completed: Some(true),
                completed_at: Some(Some(explicit)),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(merged.completed_at, Some(explicit));
    }

    #[test]
    fn test_patch_never_touches_id_or_created_at() {
        let item = sample();
        let merged = item.apply_patch(
            ActivityItemPatch {
                item_type: Some("note".to_string()),
                title: Some("Renamed".to_string()),
                priority: Some(9),
                tags: Some("a,b".to_string()),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(merged.id, item.id);
        assert_eq!(merged.created_at, item.created_at);
        assert_eq!(merged.title, "Renamed");
        assert_eq!(merged.priority, 9);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("type").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("completedAt").is_some());
        assert!(value.get("item_type").is_none());
    }
}
