//! Handlers for the sales performance log: entries, summary, trends.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use sentinel_core::audit::EntityKind;
use sentinel_core::reporting;
use sentinel_core::roles::{authorize, Action};
use sentinel_db::models::sales_log::{
    CreateSalesLogEntry, SalesLogParams, TrendGroupBy, TrendPeriod,
};
use sentinel_db::repositories::SalesLogRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::meta::RequestMeta;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /sales-log
///
/// List sales with filters, newest first.
pub async fn list_sales(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SalesLogParams>,
) -> AppResult<impl IntoResponse> {
    let page = SalesLogRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /sales-log
///
/// Log a sale; the acting user is the producer of record.
pub async fn create_sale(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Json(input): Json<CreateSalesLogEntry>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::SalesLogEntry)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let entry = SalesLogRepo::create(&state.pool, &ctx, user.user_id, &input).await?;

    tracing::info!(user_id = %user.user_id, entry_id = %entry.id, "Sale logged");

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /sales-log/summary
///
/// Summary cards (today / this week / this month / YTD) and the monthly
/// auto-quota standing.
pub async fn sales_summary(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let today = chrono::Utc::now().date_naive();
    let summary =
        SalesLogRepo::summary(&state.pool, today, state.config.auto_quota_target).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// Query parameters for trend analysis.
#[derive(Debug, Deserialize)]
pub struct TrendParams {
    pub period: Option<TrendPeriod>,
    pub group_by: Option<TrendGroupBy>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// GET /sales-log/trends
///
/// Count + premium per period bucket per group; defaults to monthly buckets
/// grouped by line of business over the year to date.
pub async fn sales_trends(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TrendParams>,
) -> AppResult<impl IntoResponse> {
    let today = chrono::Utc::now().date_naive();
    let from = params.date_from.unwrap_or_else(|| reporting::year_start(today));
    let to = params.date_to.unwrap_or(today);

    let trends = SalesLogRepo::trends(
        &state.pool,
        params.period.unwrap_or(TrendPeriod::Monthly),
        params.group_by.unwrap_or(TrendGroupBy::Lob),
        from,
        to,
    )
    .await?;

    Ok(Json(DataResponse { data: trends }))
}
