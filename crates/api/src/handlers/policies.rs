//! Handlers for policies and their installments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use sentinel_core::audit::EntityKind;
use sentinel_core::error::CoreError;
use sentinel_core::roles::{authorize, Action};
use sentinel_core::types::DbId;
use sentinel_db::models::policy::{
    CreateInstallment, CreatePolicy, PolicyListParams, UpdateInstallment, UpdatePolicy,
};
use sentinel_db::repositories::{InstallmentRepo, PolicyRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::meta::RequestMeta;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /policies
///
/// List policies with filters, ordered by expiration date.
pub async fn list_policies(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PolicyListParams>,
) -> AppResult<impl IntoResponse> {
    let page = PolicyRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /policies
pub async fn create_policy(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Json(input): Json<CreatePolicy>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::Policy)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let policy = PolicyRepo::create(&state.pool, &ctx, &input).await?;

    tracing::info!(user_id = %user.user_id, policy_id = %policy.id, "Policy created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: policy })))
}

/// GET /policies/{id}
pub async fn get_policy(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let policy = PolicyRepo::find_row_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Policy",
                id,
            })
        })?;

    Ok(Json(DataResponse { data: policy }))
}

/// PUT /policies/{id}
///
/// Update a policy; only actually-changed fields are written and audited.
pub async fn update_policy(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePolicy>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Update, EntityKind::Policy)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let policy = PolicyRepo::update(&state.pool, &ctx, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Policy",
                id,
            })
        })?;

    tracing::info!(user_id = %user.user_id, policy_id = %id, "Policy updated");

    Ok(Json(DataResponse { data: policy }))
}

// ---------------------------------------------------------------------------
// Installments
// ---------------------------------------------------------------------------

/// GET /policies/{id}/installments
pub async fn list_installments(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let installments = InstallmentRepo::list_by_policy(&state.pool, id).await?;
    Ok(Json(DataResponse { data: installments }))
}

/// POST /policies/{id}/installments
pub async fn create_installment(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateInstallment>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::Installment)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let installment = InstallmentRepo::create(&state.pool, &ctx, id, &input).await?;

    tracing::info!(
        user_id = %user.user_id,
        policy_id = %id,
        installment_id = %installment.id,
        "Installment created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: installment }),
    ))
}

/// PUT /installments/{id}
///
/// Update an installment; only actually-changed fields are written and
/// audited.
pub async fn update_installment(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInstallment>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Update, EntityKind::Installment)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let installment = InstallmentRepo::update(&state.pool, &ctx, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Installment",
                id,
            })
        })?;

    tracing::info!(user_id = %user.user_id, installment_id = %id, "Installment updated");

    Ok(Json(DataResponse { data: installment }))
}
