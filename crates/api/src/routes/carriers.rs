//! Route definitions for carriers.
//!
//! Mounted at `/carriers` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::carriers;
use crate::state::AppState;

/// Carrier routes.
///
/// ```text
/// GET  /               -> list_carriers (?search)
/// POST /               -> create_carrier
/// GET  /{id}           -> get_carrier
/// GET  /{id}/contacts  -> list_carrier_contacts
/// POST /{id}/contacts  -> create_carrier_contact
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(carriers::list_carriers).post(carriers::create_carrier),
        )
        .route("/{id}", get(carriers::get_carrier))
        .route(
            "/{id}/contacts",
            get(carriers::list_carrier_contacts).post(carriers::create_carrier_contact),
        )
}
