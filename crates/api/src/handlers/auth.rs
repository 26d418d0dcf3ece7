//! Authentication handlers: login, registration, first-run setup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use sentinel_core::error::CoreError;
use sentinel_db::models::user::{RegisterUser, UserProfile};
use sentinel_db::repositories::{AuditContext, UserRepo};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::meta::RequestMeta;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: bearer token plus the authenticated user.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// POST /auth/login
///
/// Verify credentials, stamp `last_login`, write the Login audit entry, and
/// issue an access token.
pub async fn login(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(body): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_email(&state.pool, &body.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let verified = verify_password(&body.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is disabled".into(),
        )));
    }

    let ctx = AuditContext {
        actor_id: Some(user.id),
        ip_address: meta.ip_address.clone(),
        user_agent: meta.user_agent.clone(),
    };
    UserRepo::record_login(&state.pool, &ctx, user.id).await?;

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(DataResponse {
        data: TokenResponse {
            access_token,
            user: user.into(),
        },
    }))
}

/// POST /auth/register
///
/// Create a new user. Admin only.
pub async fn register(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    meta: RequestMeta,
    Json(input): Json<RegisterUser>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let ctx = meta.audit_context(&admin);
    let user = UserRepo::create(
        &state.pool,
        &ctx,
        &input.email,
        &input.name,
        &password_hash,
        input.role.as_deref().unwrap_or("CSR"),
    )
    .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserProfile::from(user),
        }),
    ))
}

/// POST /auth/setup
///
/// One-time setup: creates the first Admin user. Only works while no users
/// exist.
pub async fn setup(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(input): Json<RegisterUser>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if UserRepo::count(&state.pool).await? > 0 {
        return Err(AppError::BadRequest(
            "Setup already completed. Users exist.".into(),
        ));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    // The first user is always an Admin; no actor exists yet.
    let ctx = meta.anonymous_context();
    let user = UserRepo::create(
        &state.pool,
        &ctx,
        &input.email,
        &input.name,
        &password_hash,
        "Admin",
    )
    .await?;

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = %user.id, "Initial admin created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TokenResponse {
                access_token,
                user: user.into(),
            },
        }),
    ))
}

/// GET /auth/me
///
/// The authenticated user's profile.
pub async fn me(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user.user_id,
            })
        })?;

    Ok(Json(DataResponse { data: profile }))
}
