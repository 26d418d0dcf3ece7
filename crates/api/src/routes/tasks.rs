//! Route definitions for tasks.
//!
//! Mounted at `/tasks` by `api_routes()`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Task routes.
///
/// ```text
/// GET  /      -> list_tasks (?assigned_to, status, priority, due_before, linked_entity_type, linked_entity_id)
/// POST /      -> create_task
/// GET  /my    -> my_tasks (?status, priority)
/// PUT  /{id}  -> update_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route("/my", get(tasks::my_tasks))
        .route("/{id}", put(tasks::update_task))
}
