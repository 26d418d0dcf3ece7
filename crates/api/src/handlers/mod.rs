//! Request handlers, one module per resource.
//!
//! Every mutation handler runs the role gate before touching the target row,
//! validates the payload, then hands an `AuditContext` to the repository
//! pipeline so the change and its audit entries commit together.

pub mod accounts;
pub mod audit;
pub mod auth;
pub mod carriers;
pub mod contacts;
pub mod dashboard;
pub mod notes_comms;
pub mod policies;
pub mod prospects;
pub mod sales_log;
pub mod service_board;
pub mod tasks;
