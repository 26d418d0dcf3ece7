//! Route definitions for the admin audit log surface.
//!
//! Mounted at `/admin` by `api_routes()`. Read-only by design.

use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Admin audit routes.
///
/// ```text
/// GET /audit-logs                            -> query_audit_logs (?user_id, action, entity_type, entity_id, from, to, limit, offset)
/// GET /audit-logs/{entity_type}/{entity_id}  -> entity_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/audit-logs", get(audit::query_audit_logs))
        .route(
            "/audit-logs/{entity_type}/{entity_id}",
            get(audit::entity_history),
        )
}
