//! Audit events.
//!
//! Every reconciliation records an audit event capturing the before and
//! after state of the affected user. Events are append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Kind of audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// An entity was created.
    Created,
    /// An entity was updated.
    Updated,
    /// An entity was deleted.
    Deleted,
}

impl AuditAction {
    /// Returns the database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Updated => "UPDATED",
            Self::Deleted => "DELETED",
        }
    }
}

/// A recorded audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique identifier.
    pub id: Uuid,
    /// Kind of action.
    pub action: AuditAction,
    /// Type of the affected entity (e.g. `user`).
    pub entity_type: String,
    /// Identifier of the affected entity.
    pub entity_id: String,
    /// State before the change, when applicable.
    pub old_values: Option<Value>,
    /// State after the change, when applicable.
    pub new_values: Option<Value>,
    /// When the event occurred.
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Records an entity creation.
    #[must_use]
    pub fn creation(entity_type: impl Into<String>, entity_id: impl Into<String>, data: Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            action: AuditAction::Created,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            old_values: None,
            new_values: Some(data),
            created_at: Utc::now(),
        }
    }

    /// Records an entity update with before/after snapshots.
    #[must_use]
    pub fn update(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        old_values: Value,
        new_values: Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            action: AuditAction::Updated,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            old_values: Some(old_values),
            new_values: Some(new_values),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creation_has_no_old_values() {
        let event = AuditEvent::creation("user", "abc", json!({"username": "jdoe"}));
        assert_eq!(event.action, AuditAction::Created);
        assert!(event.old_values.is_none());
        assert!(event.new_values.is_some());
    }

    #[test]
    fn update_carries_both_snapshots() {
        let event = AuditEvent::update(
            "user",
            "abc",
            json!({"email": "old@example.com"}),
            json!({"email": "new@example.com"}),
        );
        assert_eq!(event.action, AuditAction::Updated);
        assert!(event.old_values.is_some());
        assert!(event.new_values.is_some());
    }
}
