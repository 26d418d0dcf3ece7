//! Carrier and carrier contact models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use sentinel_core::types::{DbId, Timestamp};

use super::one_of;

/// Allowed values for `carriers.carrier_type`.
pub const CARRIER_TYPES: &[&str] = &["Direct", "Wholesaler", "MGA"];

/// A row from the `carriers` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Carrier {
    pub id: DbId,
    pub name: String,
    pub carrier_type: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub portal_url: Option<String>,
    pub appetite_notes: Option<String>,
    pub am_best_rating: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new carrier.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarrier {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom(function = valid_carrier_type))]
    pub carrier_type: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 500))]
    pub portal_url: Option<String>,
    pub appetite_notes: Option<String>,
    #[validate(length(max = 20))]
    pub am_best_rating: Option<String>,
}

/// A row from the `carrier_contacts` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CarrierContact {
    pub id: DbId,
    pub carrier_id: DbId,
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty_lobs: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a carrier contact under a carrier.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarrierContact {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 100))]
    pub title: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub specialty_lobs: Option<String>,
    pub notes: Option<String>,
}

fn valid_carrier_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, CARRIER_TYPES, "carrier_type")
}
