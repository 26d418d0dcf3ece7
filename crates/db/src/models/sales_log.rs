//! Sales performance log models and DTOs, plus summary/trend types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use sentinel_core::reporting::QuotaStatus;
use sentinel_core::types::{DbId, Money, Timestamp};

use super::one_of;

/// Allowed values for `sales_log_entries.sale_type`.
pub const SALE_TYPES: &[&str] = &["New Business", "Rewrite", "Cross-Sell", "Renewal"];

/// Allowed values for `sales_log_entries.source`.
pub const SALE_SOURCES: &[&str] =
    &["Referral", "Web", "Walk-in", "Marketing", "Cross-Sell", "Other"];

/// A row from the `sales_log_entries` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SalesLogEntry {
    pub id: DbId,
    pub sale_date: NaiveDate,
    pub account_id: DbId,
    pub prospect_id: Option<DbId>,
    pub policy_id: Option<DbId>,
    pub line_of_business: String,
    pub premium: Money,
    pub carrier_id: Option<DbId>,
    pub producer_id: DbId,
    pub source: Option<String>,
    pub source_detail: Option<String>,
    pub zip_code: Option<String>,
    pub county: Option<String>,
    pub sale_type: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// Sales log list row enriched with joined display names.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SalesLogRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub entry: SalesLogEntry,
    pub account_name: Option<String>,
    pub carrier_name: Option<String>,
    pub producer_name: Option<String>,
}

/// DTO for logging a sale. `producer_id` is always the acting user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSalesLogEntry {
    pub sale_date: Option<NaiveDate>,
    pub account_id: DbId,
    pub prospect_id: Option<DbId>,
    pub policy_id: Option<DbId>,
    #[validate(length(min = 1, max = 100))]
    pub line_of_business: String,
    pub premium: Money,
    pub carrier_id: Option<DbId>,
    #[validate(custom(function = valid_sale_source))]
    pub source: Option<String>,
    #[validate(length(max = 255))]
    pub source_detail: Option<String>,
    #[validate(length(max = 10))]
    pub zip_code: Option<String>,
    #[validate(length(max = 100))]
    pub county: Option<String>,
    #[validate(custom(function = valid_sale_type))]
    pub sale_type: String,
    pub notes: Option<String>,
}

/// Filter parameters for sales log lists.
#[derive(Debug, Default, Deserialize)]
pub struct SalesLogParams {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub line_of_business: Option<String>,
    pub sale_type: Option<String>,
    pub source: Option<String>,
    pub zip_code: Option<String>,
    pub county: Option<String>,
    pub carrier_id: Option<DbId>,
    pub producer_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Count + premium for one summary window.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PeriodStats {
    pub count: i64,
    pub premium: Money,
}

/// Summary cards: today, this week, month-to-date, YTD, plus the quota block.
#[derive(Debug, Serialize)]
pub struct SalesSummary {
    pub today: PeriodStats,
    pub this_week: PeriodStats,
    pub this_month: PeriodStats,
    pub ytd: PeriodStats,
    pub auto_quota: QuotaStatus,
}

/// Time bucketing for trend queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    Daily,
    Weekly,
    Monthly,
}

/// Grouping dimension for trend queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendGroupBy {
    Lob,
    Source,
    Zip,
    County,
    Carrier,
    SaleType,
}

/// One trend data point: a period bucket within a group.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TrendPoint {
    pub period: NaiveDate,
    pub group_key: Option<String>,
    pub count: i64,
    pub premium: Money,
}

fn valid_sale_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, SALE_TYPES, "sale_type")
}

fn valid_sale_source(value: &str) -> Result<(), ValidationError> {
    one_of(value, SALE_SOURCES, "sale_source")
}
