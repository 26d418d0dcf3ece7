//! Account models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use sentinel_core::types::{DbId, Timestamp};

use super::one_of;

/// Allowed values for `accounts.account_type`.
pub const ACCOUNT_TYPES: &[&str] = &["Personal", "Commercial"];

/// Allowed values for `accounts.status`.
pub const ACCOUNT_STATUSES: &[&str] = &["Active", "Inactive", "Prospect"];

/// A row from the `accounts` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: DbId,
    pub name: String,
    pub account_type: String,
    pub status: String,
    pub primary_contact_id: Option<DbId>,
    pub assigned_producer_id: Option<DbId>,
    pub assigned_csr_id: Option<DbId>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub county: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccount {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom(function = valid_account_type))]
    pub account_type: String,
    #[validate(custom(function = valid_account_status))]
    pub status: Option<String>,
    pub primary_contact_id: Option<DbId>,
    pub assigned_producer_id: Option<DbId>,
    pub assigned_csr_id: Option<DbId>,
    #[validate(length(max = 255))]
    pub address_line1: Option<String>,
    #[validate(length(max = 255))]
    pub address_line2: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 2))]
    pub state: Option<String>,
    #[validate(length(max = 10))]
    pub zip_code: Option<String>,
    #[validate(length(max = 100))]
    pub county: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Patch DTO for updating an account. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAccount {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom(function = valid_account_type))]
    pub account_type: Option<String>,
    #[validate(custom(function = valid_account_status))]
    pub status: Option<String>,
    pub primary_contact_id: Option<DbId>,
    pub assigned_producer_id: Option<DbId>,
    pub assigned_csr_id: Option<DbId>,
    #[validate(length(max = 255))]
    pub address_line1: Option<String>,
    #[validate(length(max = 255))]
    pub address_line2: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 2))]
    pub state: Option<String>,
    #[validate(length(max = 10))]
    pub zip_code: Option<String>,
    #[validate(length(max = 100))]
    pub county: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Filter parameters for account lists.
#[derive(Debug, Default, Deserialize)]
pub struct AccountListParams {
    pub search: Option<String>,
    pub account_type: Option<String>,
    pub status: Option<String>,
    pub zip_code: Option<String>,
    pub county: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn valid_account_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, ACCOUNT_TYPES, "account_type")
}

fn valid_account_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, ACCOUNT_STATUSES, "account_status")
}
