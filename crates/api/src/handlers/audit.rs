//! Handlers for the admin audit log query surface.
//!
//! Read-only: the trail has no mutation surface anywhere in the API.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use sentinel_core::types::DbId;
use sentinel_db::models::audit::AuditQuery;
use sentinel_db::repositories::AuditRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /admin/audit-logs
///
/// Query audit logs with filters and pagination. Admin only.
pub async fn query_audit_logs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AuditQuery>,
) -> AppResult<impl IntoResponse> {
    let page = AuditRepo::query(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /admin/audit-logs/{entity_type}/{entity_id}
///
/// One entity's full change history, oldest first. Admin only.
pub async fn entity_history(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let entries = AuditRepo::history(&state.pool, &entity_type, entity_id).await?;
    Ok(Json(DataResponse { data: entries }))
}
