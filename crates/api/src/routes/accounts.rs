//! Route definitions for accounts.
//!
//! Mounted at `/accounts` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Account routes.
///
/// ```text
/// GET    /               -> list_accounts (?search, account_type, status, zip_code, county, limit, offset)
/// POST   /               -> create_account
/// GET    /{id}           -> get_account
/// PUT    /{id}           -> update_account
/// DELETE /{id}           -> delete_account (admin only)
/// GET    /{id}/contacts  -> list_account_contacts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route(
            "/{id}",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/{id}/contacts", get(accounts::list_account_contacts))
}
