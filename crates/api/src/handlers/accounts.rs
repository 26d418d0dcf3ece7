//! Handlers for accounts: CRUD, search, and role-scoped visibility.
//!
//! Producers only see accounts where they are the assigned producer; an
//! out-of-scope fetch by exact id is Forbidden, not NotFound. Account is the
//! one entity that supports deletion, and only for admins.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use sentinel_core::audit::EntityKind;
use sentinel_core::error::CoreError;
use sentinel_core::roles::{authorize, producer_scope, Action, Role};
use sentinel_core::types::DbId;
use sentinel_db::models::account::{AccountListParams, CreateAccount, UpdateAccount};
use sentinel_db::repositories::{AccountRepo, ContactRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::meta::RequestMeta;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /accounts
///
/// List accounts with filters; Producers see only their own.
pub async fn list_accounts(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AccountListParams>,
) -> AppResult<impl IntoResponse> {
    let scope = producer_scope(user.role, user.user_id);
    let page = AccountRepo::list(&state.pool, &params, scope).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /accounts
///
/// Create a new account.
pub async fn create_account(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Json(input): Json<CreateAccount>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::Account)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let account = AccountRepo::create(&state.pool, &ctx, &input).await?;

    tracing::info!(user_id = %user.user_id, account_id = %account.id, "Account created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: account })))
}

/// GET /accounts/{id}
///
/// Fetch one account. Out-of-scope producers get Forbidden.
pub async fn get_account(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let account = AccountRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Account",
                id,
            })
        })?;

    if user.role == Role::Producer && account.assigned_producer_id != Some(user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden("Access denied".into())));
    }

    Ok(Json(DataResponse { data: account }))
}

/// PUT /accounts/{id}
///
/// Update an account; only actually-changed fields are written and audited.
pub async fn update_account(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAccount>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Update, EntityKind::Account)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let account = AccountRepo::update(&state.pool, &ctx, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Account",
                id,
            })
        })?;

    tracing::info!(user_id = %user.user_id, account_id = %id, "Account updated");

    Ok(Json(DataResponse { data: account }))
}

/// DELETE /accounts/{id}
///
/// Delete an account. Admin only; the Delete audit entry is written before
/// the row is removed.
pub async fn delete_account(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Delete, EntityKind::Account)?;

    let ctx = meta.audit_context(&user);
    let deleted = AccountRepo::delete(&state.pool, &ctx, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Account",
            id,
        }));
    }

    tracing::info!(user_id = %user.user_id, account_id = %id, "Account deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /accounts/{id}/contacts
///
/// List an account's contacts, primary first.
pub async fn list_account_contacts(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contacts = ContactRepo::list_by_account(&state.pool, id).await?;
    Ok(Json(DataResponse { data: contacts }))
}
