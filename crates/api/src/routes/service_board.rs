//! Route definitions for the service board.
//!
//! Mounted at `/service-board` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::service_board;
use crate::state::AppState;

/// Service board routes.
///
/// ```text
/// GET  /      -> get_board (?item_type, status, urgency, assigned_to, due_before, due_after, account_id, policy_id, search)
/// POST /      -> create_item
/// GET  /{id}  -> get_item
/// PUT  /{id}  -> update_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(service_board::get_board).post(service_board::create_item),
        )
        .route(
            "/{id}",
            get(service_board::get_item).put(service_board::update_item),
        )
}
