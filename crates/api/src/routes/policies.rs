//! Route definitions for policies and installments.
//!
//! Mounted at `/policies` by `api_routes()`; installment updates live at the
//! top level (`/installments/{id}`) since they are addressed by their own id.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::policies;
use crate::state::AppState;

/// Policy routes.
///
/// ```text
/// GET  /                   -> list_policies (?account_id, line_of_business, carrier_id, status, expiring_before, expiring_after, limit, offset)
/// POST /                   -> create_policy
/// GET  /{id}               -> get_policy
/// PUT  /{id}               -> update_policy
/// GET  /{id}/installments  -> list_installments
/// POST /{id}/installments  -> create_installment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(policies::list_policies).post(policies::create_policy),
        )
        .route(
            "/{id}",
            get(policies::get_policy).put(policies::update_policy),
        )
        .route(
            "/{id}/installments",
            get(policies::list_installments).post(policies::create_installment),
        )
}

/// Top-level installment routes.
///
/// ```text
/// PUT /installments/{id} -> update_installment
/// ```
pub fn installments_router() -> Router<AppState> {
    Router::new().route("/installments/{id}", put(policies::update_installment))
}
