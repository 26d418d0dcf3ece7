//! Route definitions, one module per resource.

use axum::Router;

use crate::state::AppState;

pub mod accounts;
pub mod audit;
pub mod auth;
pub mod carriers;
pub mod contacts;
pub mod dashboard;
pub mod health;
pub mod notes_comms;
pub mod policies;
pub mod prospects;
pub mod sales_log;
pub mod service_board;
pub mod tasks;

/// All API v1 routes, mounted under `/api/v1` by the router builder.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/accounts", accounts::router())
        .nest("/contacts", contacts::router())
        .nest("/carriers", carriers::router())
        .nest("/policies", policies::router())
        .nest("/prospects", prospects::router())
        .nest("/tasks", tasks::router())
        .nest("/service-board", service_board::router())
        .nest("/sales-log", sales_log::router())
        .nest("/dashboard", dashboard::router())
        .nest("/admin", audit::router())
        .merge(notes_comms::router())
        .merge(policies::installments_router())
}
