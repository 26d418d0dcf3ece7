//! Route definitions for contacts.
//!
//! Mounted at `/contacts` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contacts;
use crate::state::AppState;

/// Contact routes.
///
/// ```text
/// POST /       -> create_contact
/// GET  /{id}   -> get_contact
/// PUT  /{id}   -> update_contact
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(contacts::create_contact))
        .route(
            "/{id}",
            get(contacts::get_contact).put(contacts::update_contact),
        )
}
