//! Handlers for the service board — the hub for all service operations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use sentinel_core::audit::EntityKind;
use sentinel_core::error::CoreError;
use sentinel_core::roles::{authorize, Action};
use sentinel_core::types::DbId;
use sentinel_db::models::service_item::{
    CreateServiceItem, ServiceBoardParams, UpdateServiceItem,
};
use sentinel_db::repositories::ServiceItemRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::meta::RequestMeta;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /service-board
///
/// The service board: filtered items plus aggregate counts for the header.
/// Terminal items are excluded unless a status filter asks for them.
pub async fn get_board(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ServiceBoardParams>,
) -> AppResult<impl IntoResponse> {
    let board = ServiceItemRepo::board(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: board }))
}

/// POST /service-board
pub async fn create_item(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Json(input): Json<CreateServiceItem>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::ServiceItem)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let item = ServiceItemRepo::create(&state.pool, &ctx, &input).await?;

    tracing::info!(user_id = %user.user_id, item_id = %item.id, "Service item created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /service-board/{id}
pub async fn get_item(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ServiceItemRepo::find_row_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "ServiceItem",
                id,
            })
        })?;

    Ok(Json(DataResponse { data: item }))
}

/// PUT /service-board/{id}
///
/// Update a service item; completing or closing it stamps `completed_at` in
/// the same update.
pub async fn update_item(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateServiceItem>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Update, EntityKind::ServiceItem)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let item = ServiceItemRepo::update(&state.pool, &ctx, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "ServiceItem",
                id,
            })
        })?;

    tracing::info!(user_id = %user.user_id, item_id = %id, "Service item updated");

    Ok(Json(DataResponse { data: item }))
}
