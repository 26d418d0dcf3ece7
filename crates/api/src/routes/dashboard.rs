//! Route definitions for the dashboard.
//!
//! Mounted at `/dashboard` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Dashboard routes.
///
/// ```text
/// GET / -> get_dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard::get_dashboard))
}
