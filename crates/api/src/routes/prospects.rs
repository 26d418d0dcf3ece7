//! Route definitions for prospects.
//!
//! Mounted at `/prospects` by `api_routes()`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::prospects;
use crate::state::AppState;

/// Prospect routes.
///
/// ```text
/// GET  /               -> list_prospects (?pipeline_stage, source, assigned_producer_id, search, limit, offset)
/// POST /               -> create_prospect
/// GET  /pipeline       -> pipeline_summary
/// GET  /{id}           -> get_prospect
/// PUT  /{id}           -> update_prospect
/// PUT  /{id}/stage     -> update_stage (?stage)
/// POST /{id}/convert   -> convert_prospect
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(prospects::list_prospects).post(prospects::create_prospect),
        )
        .route("/pipeline", get(prospects::pipeline_summary))
        .route(
            "/{id}",
            get(prospects::get_prospect).put(prospects::update_prospect),
        )
        .route("/{id}/stage", put(prospects::update_stage))
        .route("/{id}/convert", post(prospects::convert_prospect))
}
