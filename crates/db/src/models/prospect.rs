//! Prospect models and DTOs, including pipeline and conversion types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use sentinel_core::types::{DbId, Money, Timestamp};

use super::one_of;

/// Allowed values for `prospects.source`.
pub const PROSPECT_SOURCES: &[&str] =
    &["Referral", "Web", "Walk-in", "Marketing", "Cross-Sell", "Other"];

/// Pipeline stages in funnel order. The last two are terminal.
pub const PIPELINE_STAGES: &[&str] = &[
    "New Lead",
    "Contacted",
    "Quoting",
    "Quoted",
    "Closed-Won",
    "Closed-Lost",
];

/// A row from the `prospects` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Prospect {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub source_detail: Option<String>,
    pub referrer_account_id: Option<DbId>,
    pub lob_interest: Option<String>,
    pub estimated_premium: Option<Money>,
    pub current_carrier: Option<String>,
    pub current_expiration: Option<NaiveDate>,
    pub pipeline_stage: String,
    pub assigned_producer_id: Option<DbId>,
    pub zip_code: Option<String>,
    pub county: Option<String>,
    pub closed_at: Option<Timestamp>,
    pub close_reason: Option<String>,
    pub converted_account_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new prospect.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProspect {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(max = 255))]
    pub business_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(custom(function = valid_prospect_source))]
    pub source: Option<String>,
    #[validate(length(max = 255))]
    pub source_detail: Option<String>,
    pub referrer_account_id: Option<DbId>,
    #[validate(length(max = 255))]
    pub lob_interest: Option<String>,
    pub estimated_premium: Option<Money>,
    #[validate(length(max = 255))]
    pub current_carrier: Option<String>,
    pub current_expiration: Option<NaiveDate>,
    pub assigned_producer_id: Option<DbId>,
    #[validate(length(max = 10))]
    pub zip_code: Option<String>,
    #[validate(length(max = 100))]
    pub county: Option<String>,
}

/// Patch DTO for updating a prospect. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProspect {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 255))]
    pub business_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(custom(function = valid_prospect_source))]
    pub source: Option<String>,
    #[validate(length(max = 255))]
    pub source_detail: Option<String>,
    #[validate(length(max = 255))]
    pub lob_interest: Option<String>,
    pub estimated_premium: Option<Money>,
    #[validate(length(max = 255))]
    pub current_carrier: Option<String>,
    pub current_expiration: Option<NaiveDate>,
    #[validate(custom(function = valid_pipeline_stage))]
    pub pipeline_stage: Option<String>,
    pub assigned_producer_id: Option<DbId>,
    #[validate(length(max = 10))]
    pub zip_code: Option<String>,
    #[validate(length(max = 100))]
    pub county: Option<String>,
    pub close_reason: Option<String>,
}

/// Filter parameters for prospect lists.
#[derive(Debug, Default, Deserialize)]
pub struct ProspectListParams {
    pub pipeline_stage: Option<String>,
    pub source: Option<String>,
    pub assigned_producer_id: Option<DbId>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Per-stage rollup for the pipeline Kanban board.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PipelineStageSummary {
    pub pipeline_stage: String,
    pub count: i64,
    pub value: Money,
}

/// Outcome of converting a won prospect into an account.
#[derive(Debug)]
pub enum ConvertOutcome {
    Converted(super::account::Account),
    AlreadyConverted,
    NotFound,
}

fn valid_prospect_source(value: &str) -> Result<(), ValidationError> {
    one_of(value, PROSPECT_SOURCES, "prospect_source")
}

fn valid_pipeline_stage(value: &str) -> Result<(), ValidationError> {
    one_of(value, PIPELINE_STAGES, "pipeline_stage")
}
