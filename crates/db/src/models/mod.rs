//! Entity models and DTOs.
//!
//! Each module holds the row struct for one table, its `Create*` DTO, and —
//! where the entity is mutable — an all-`Option` `Update*` patch DTO. A
//! `None` patch field means "absent from the payload, leave untouched";
//! clearing a nullable column through a patch is not supported.

use serde::Serialize;
use validator::ValidationError;

pub mod account;
pub mod audit;
pub mod carrier;
pub mod contact;
pub mod dashboard;
pub mod note;
pub mod policy;
pub mod prospect;
pub mod sales_log;
pub mod service_item;
pub mod task;
pub mod user;

/// Standard paginated list envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Validate that a value is a member of an allowed enum set.
pub(crate) fn one_of(
    value: &str,
    allowed: &'static [&'static str],
    code: &'static str,
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let mut err = ValidationError::new(code);
    err.message = Some(format!("must be one of: {}", allowed.join(", ")).into());
    Err(err)
}
