//! Service board item models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use validator::{Validate, ValidationError};

use sentinel_core::types::{DbId, Timestamp};

use super::one_of;

/// Allowed values for `service_items.item_type`.
pub const SERVICE_ITEM_TYPES: &[&str] = &[
    "Renewal",
    "MidTermReview",
    "Rewrite",
    "Endorsement",
    "UWIssue",
    "NonRenewal",
    "PaymentIssue",
    "General",
];

/// Allowed values for `service_items.status`.
pub const SERVICE_ITEM_STATUSES: &[&str] = &[
    "Not Started",
    "In Progress",
    "Awaiting Insured",
    "Awaiting Carrier",
    "Action Required",
    "Completed",
    "Closed",
    "Escalated",
];

/// Allowed values for `service_items.urgency`.
pub const URGENCY_LEVELS: &[&str] = &["Low", "Medium", "High", "Critical"];

/// A row from the `service_items` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ServiceItem {
    pub id: DbId,
    pub item_type: String,
    pub account_id: DbId,
    pub policy_id: Option<DbId>,
    pub description: Option<String>,
    pub status: String,
    pub assigned_to: Option<DbId>,
    pub due_date: Option<NaiveDate>,
    pub urgency: String,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Service board row enriched with joined display names.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ServiceItemRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: ServiceItem,
    pub account_name: Option<String>,
    pub policy_lob: Option<String>,
    pub assignee_name: Option<String>,
}

/// The service board: filtered items plus header counts.
#[derive(Debug, Serialize)]
pub struct ServiceBoard {
    pub items: Vec<ServiceItemRow>,
    pub total: i64,
    pub counts_by_status: HashMap<String, i64>,
    pub counts_by_type: HashMap<String, i64>,
}

/// DTO for creating a new service item.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceItem {
    #[validate(custom(function = valid_item_type))]
    pub item_type: String,
    pub account_id: DbId,
    pub policy_id: Option<DbId>,
    pub description: Option<String>,
    #[validate(custom(function = valid_item_status))]
    pub status: Option<String>,
    pub assigned_to: Option<DbId>,
    pub due_date: Option<NaiveDate>,
    #[validate(custom(function = valid_urgency))]
    pub urgency: Option<String>,
}

/// Patch DTO for updating a service item. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateServiceItem {
    #[validate(custom(function = valid_item_type))]
    pub item_type: Option<String>,
    pub policy_id: Option<DbId>,
    pub description: Option<String>,
    #[validate(custom(function = valid_item_status))]
    pub status: Option<String>,
    pub assigned_to: Option<DbId>,
    pub due_date: Option<NaiveDate>,
    #[validate(custom(function = valid_urgency))]
    pub urgency: Option<String>,
}

/// Filter parameters for the service board.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceBoardParams {
    pub item_type: Option<String>,
    pub status: Option<String>,
    pub urgency: Option<String>,
    pub assigned_to: Option<DbId>,
    pub due_before: Option<NaiveDate>,
    pub due_after: Option<NaiveDate>,
    pub account_id: Option<DbId>,
    pub policy_id: Option<DbId>,
    pub search: Option<String>,
}

fn valid_item_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, SERVICE_ITEM_TYPES, "service_item_type")
}

fn valid_item_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, SERVICE_ITEM_STATUSES, "service_item_status")
}

fn valid_urgency(value: &str) -> Result<(), ValidationError> {
    one_of(value, URGENCY_LEVELS, "urgency")
}
