//! Policy and installment models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use sentinel_core::types::{DbId, Money, Timestamp};

use super::one_of;

/// Allowed values for `policies.status`.
pub const POLICY_STATUSES: &[&str] =
    &["Active", "Cancelled", "Expired", "Non-Renewed", "Rewritten"];

/// Allowed values for `installments.status`.
pub const INSTALLMENT_STATUSES: &[&str] =
    &["Scheduled", "Reminded", "Paid", "Past Due", "Cancelled"];

/// A row from the `policies` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Policy {
    pub id: DbId,
    pub account_id: DbId,
    pub carrier_id: Option<DbId>,
    pub line_of_business: String,
    pub policy_number: Option<String>,
    pub effective_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub premium: Option<Money>,
    pub payment_plan: Option<String>,
    pub renewal_status: String,
    pub status: String,
    pub servicing_owner_id: Option<DbId>,
    pub producing_agent_id: Option<DbId>,
    pub prior_policy_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Policy list row enriched with joined display names.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PolicyRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub policy: Policy,
    pub carrier_name: Option<String>,
    pub account_name: Option<String>,
}

/// DTO for creating a new policy.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePolicy {
    pub account_id: DbId,
    pub carrier_id: Option<DbId>,
    #[validate(length(min = 1, max = 100))]
    pub line_of_business: String,
    #[validate(length(max = 100))]
    pub policy_number: Option<String>,
    pub effective_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub premium: Option<Money>,
    #[validate(length(max = 20))]
    pub payment_plan: Option<String>,
    #[validate(custom(function = valid_policy_status))]
    pub status: Option<String>,
    pub servicing_owner_id: Option<DbId>,
    pub producing_agent_id: Option<DbId>,
    pub prior_policy_id: Option<DbId>,
}

/// Patch DTO for updating a policy. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePolicy {
    pub carrier_id: Option<DbId>,
    #[validate(length(min = 1, max = 100))]
    pub line_of_business: Option<String>,
    #[validate(length(max = 100))]
    pub policy_number: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub premium: Option<Money>,
    #[validate(length(max = 20))]
    pub payment_plan: Option<String>,
    #[validate(length(max = 30))]
    pub renewal_status: Option<String>,
    #[validate(custom(function = valid_policy_status))]
    pub status: Option<String>,
    pub servicing_owner_id: Option<DbId>,
    pub producing_agent_id: Option<DbId>,
}

/// Filter parameters for policy lists.
#[derive(Debug, Default, Deserialize)]
pub struct PolicyListParams {
    pub account_id: Option<DbId>,
    pub line_of_business: Option<String>,
    pub carrier_id: Option<DbId>,
    pub status: Option<String>,
    pub expiring_before: Option<NaiveDate>,
    pub expiring_after: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A row from the `installments` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Installment {
    pub id: DbId,
    pub policy_id: DbId,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub status: String,
    pub payment_method: Option<String>,
    pub paid_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an installment under a policy.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInstallment {
    pub due_date: NaiveDate,
    pub amount: Money,
    #[validate(custom(function = valid_installment_status))]
    pub status: Option<String>,
    #[validate(length(max = 50))]
    pub payment_method: Option<String>,
}

/// Patch DTO for updating an installment. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateInstallment {
    pub due_date: Option<NaiveDate>,
    pub amount: Option<Money>,
    #[validate(custom(function = valid_installment_status))]
    pub status: Option<String>,
    #[validate(length(max = 50))]
    pub payment_method: Option<String>,
    pub paid_date: Option<NaiveDate>,
}

fn valid_policy_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, POLICY_STATUSES, "policy_status")
}

fn valid_installment_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, INSTALLMENT_STATUSES, "installment_status")
}
