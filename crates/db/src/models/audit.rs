//! Audit log entry model and query DTOs.
//!
//! Entries are immutable once written: no `updated_at`, no update or delete
//! operations anywhere in the repository layer.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sentinel_core::types::{DbId, Timestamp};

/// A single audit log entry.
///
/// One row per discrete change: a multi-field update produces one entry per
/// changed field, not one per request. `user_id` is nullable because
/// system-initiated actions have no actor.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuditLogEntry {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub field_changed: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub metadata_json: Option<serde_json::Value>,
}

/// Filter parameters for the admin audit log query.
#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub user_id: Option<DbId>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
