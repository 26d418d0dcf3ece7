//! Role-based access control (RBAC) extractors.
//!
//! [`RequireAdmin`] wraps [`AuthUser`] and rejects requests whose role is not
//! Admin. Per-action authorization for entity mutations goes through
//! `sentinel_core::roles::authorize` inside the handlers instead, so the
//! fixed permission table stays in one place.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use sentinel_core::error::CoreError;
use sentinel_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the Admin role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
