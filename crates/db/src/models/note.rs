//! Note and communication log models and DTOs.
//!
//! Both link polymorphically to any entity via `(linked_entity_type,
//! linked_entity_id)`; the target row's existence is not validated at write
//! time.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use sentinel_core::types::{DbId, Timestamp};

use super::one_of;

/// Allowed values for `communication_logs.direction`.
pub const COMM_DIRECTIONS: &[&str] = &["Inbound", "Outbound"];

/// Allowed values for `communication_logs.channel`.
pub const COMM_CHANNELS: &[&str] = &["Email", "Phone", "SMS", "InPerson", "Other"];

/// A row from the `notes` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Note {
    pub id: DbId,
    pub content: String,
    pub linked_entity_type: String,
    pub linked_entity_id: DbId,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for creating a note against any entity.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNote {
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(length(min = 1, max = 50))]
    pub linked_entity_type: String,
    pub linked_entity_id: DbId,
}

/// A row from the `communication_logs` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommunicationLog {
    pub id: DbId,
    pub direction: String,
    pub channel: String,
    pub subject: Option<String>,
    pub body_preview: Option<String>,
    pub linked_entity_type: String,
    pub linked_entity_id: DbId,
    pub contact_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub call_duration_seconds: Option<i32>,
    pub sent_at: Option<Timestamp>,
    pub logged_at: Timestamp,
}

/// DTO for logging a communication against any entity.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommunicationLog {
    #[validate(custom(function = valid_direction))]
    pub direction: String,
    #[validate(custom(function = valid_channel))]
    pub channel: String,
    #[validate(length(max = 500))]
    pub subject: Option<String>,
    pub body_preview: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub linked_entity_type: String,
    pub linked_entity_id: DbId,
    pub contact_id: Option<DbId>,
    pub call_duration_seconds: Option<i32>,
    pub sent_at: Option<Timestamp>,
}

/// Query parameters for listing notes or communications by linked entity.
#[derive(Debug, Deserialize)]
pub struct LinkedEntityParams {
    pub linked_entity_type: String,
    pub linked_entity_id: DbId,
    pub channel: Option<String>,
}

fn valid_direction(value: &str) -> Result<(), ValidationError> {
    one_of(value, COMM_DIRECTIONS, "comm_direction")
}

fn valid_channel(value: &str) -> Result<(), ValidationError> {
    one_of(value, COMM_CHANNELS, "comm_channel")
}
