//! Route definitions for authentication.
//!
//! Mounted at `/auth` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Authentication routes.
///
/// ```text
/// POST /login    -> login
/// POST /register -> register (admin only)
/// POST /setup    -> setup (first user only)
/// GET  /me       -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/setup", post(auth::setup))
        .route("/me", get(auth::me))
}
