//! Route definitions for notes and communication logs.
//!
//! Merged at the API root by `api_routes()` (both resources are top-level).

use axum::routing::get;
use axum::Router;

use crate::handlers::notes_comms;
use crate::state::AppState;

/// Note and communication log routes.
///
/// ```text
/// GET  /notes      -> list_notes (?linked_entity_type, linked_entity_id)
/// POST /notes      -> create_note
/// GET  /comm-logs  -> list_comm_logs (?linked_entity_type, linked_entity_id, channel)
/// POST /comm-logs  -> create_comm_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/notes",
            get(notes_comms::list_notes).post(notes_comms::create_note),
        )
        .route(
            "/comm-logs",
            get(notes_comms::list_comm_logs).post(notes_comms::create_comm_log),
        )
}
