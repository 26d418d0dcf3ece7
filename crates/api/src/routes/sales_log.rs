//! Route definitions for the sales performance log.
//!
//! Mounted at `/sales-log` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::sales_log;
use crate::state::AppState;

/// Sales log routes.
///
/// ```text
/// GET  /          -> list_sales (?date_from, date_to, line_of_business, sale_type, source, zip_code, county, carrier_id, producer_id, limit, offset)
/// POST /          -> create_sale
/// GET  /summary   -> sales_summary
/// GET  /trends    -> sales_trends (?period, group_by, date_from, date_to)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sales_log::list_sales).post(sales_log::create_sale))
        .route("/summary", get(sales_log::sales_summary))
        .route("/trends", get(sales_log::sales_trends))
}
