//! Dashboard handler: the aggregated view of everything due today.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use sentinel_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /dashboard
///
/// Due/overdue counts, open pipeline, month-to-date sales, quota standing,
/// and the next items needing attention. Pure read: no audit entries.
pub async fn get_dashboard(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let today = chrono::Utc::now().date_naive();
    let snapshot =
        DashboardRepo::snapshot(&state.pool, today, state.config.auto_quota_target).await?;
    Ok(Json(DataResponse { data: snapshot }))
}
