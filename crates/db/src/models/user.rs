//! User models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use sentinel_core::types::{DbId, Timestamp};

use super::one_of;

/// Allowed values for `users.role`.
pub const USER_ROLES: &[&str] = &["Admin", "Producer", "CSR", "ReadOnly"];

/// A row from the `users` table. The password hash never leaves this crate's
/// callers; serialize a [`UserProfile`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public view of a user, safe to return from the API.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            is_active: user.is_active,
            last_login: user.last_login,
        }
    }
}

/// DTO for registering a user (hash computed by the caller).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(custom(function = valid_role))]
    pub role: Option<String>,
}

fn valid_role(value: &str) -> Result<(), ValidationError> {
    one_of(value, USER_ROLES, "user_role")
}
