//! Contact models and DTOs. Contacts always belong to an account.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use sentinel_core::types::{DbId, Timestamp};

/// A row from the `contacts` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Contact {
    pub id: DbId,
    pub account_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub role: Option<String>,
    pub is_primary: bool,
    pub communication_preference: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new contact.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContact {
    pub account_id: DbId,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 20))]
    pub mobile_phone: Option<String>,
    #[validate(length(max = 50))]
    pub role: Option<String>,
    pub is_primary: Option<bool>,
    #[validate(length(max = 50))]
    pub communication_preference: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
}

/// Patch DTO for updating a contact. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateContact {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 20))]
    pub mobile_phone: Option<String>,
    #[validate(length(max = 50))]
    pub role: Option<String>,
    pub is_primary: Option<bool>,
    #[validate(length(max = 50))]
    pub communication_preference: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
}
