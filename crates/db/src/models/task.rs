//! Task models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use sentinel_core::types::{DbId, Timestamp};

use super::one_of;

/// Allowed values for `tasks.priority`.
pub const TASK_PRIORITIES: &[&str] = &["Low", "Medium", "High", "Urgent"];

/// Allowed values for `tasks.status`.
pub const TASK_STATUSES: &[&str] = &["Open", "In Progress", "Completed", "Cancelled"];

/// A row from the `tasks` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub linked_entity_type: Option<String>,
    pub linked_entity_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub created_by: Option<DbId>,
    pub due_date: Option<NaiveDate>,
    pub priority: String,
    pub status: String,
    pub completed_at: Option<Timestamp>,
    pub is_recurring: bool,
    pub recurrence_rule: Option<String>,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new task.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub linked_entity_type: Option<String>,
    pub linked_entity_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub due_date: Option<NaiveDate>,
    #[validate(custom(function = valid_priority))]
    pub priority: Option<String>,
    pub is_recurring: Option<bool>,
    #[validate(length(max = 255))]
    pub recurrence_rule: Option<String>,
}

/// Patch DTO for updating a task. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 500))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<DbId>,
    pub due_date: Option<NaiveDate>,
    #[validate(custom(function = valid_priority))]
    pub priority: Option<String>,
    #[validate(custom(function = valid_task_status))]
    pub status: Option<String>,
    pub is_recurring: Option<bool>,
    #[validate(length(max = 255))]
    pub recurrence_rule: Option<String>,
}

/// Filter parameters for task lists.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub assigned_to: Option<DbId>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_before: Option<NaiveDate>,
    pub linked_entity_type: Option<String>,
    pub linked_entity_id: Option<DbId>,
    pub limit: Option<i64>,
}

fn valid_priority(value: &str) -> Result<(), ValidationError> {
    one_of(value, TASK_PRIORITIES, "task_priority")
}

fn valid_task_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, TASK_STATUSES, "task_status")
}
