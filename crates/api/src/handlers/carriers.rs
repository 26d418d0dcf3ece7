//! Handlers for carriers and carrier contacts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use sentinel_core::audit::EntityKind;
use sentinel_core::error::CoreError;
use sentinel_core::roles::{authorize, Action};
use sentinel_core::types::DbId;
use sentinel_db::models::carrier::{CreateCarrier, CreateCarrierContact};
use sentinel_db::repositories::CarrierRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::meta::RequestMeta;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the carrier list.
#[derive(Debug, Deserialize)]
pub struct CarrierListParams {
    pub search: Option<String>,
}

/// GET /carriers?search=
pub async fn list_carriers(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CarrierListParams>,
) -> AppResult<impl IntoResponse> {
    let carriers = CarrierRepo::list(&state.pool, params.search.as_deref()).await?;
    Ok(Json(DataResponse { data: carriers }))
}

/// POST /carriers
pub async fn create_carrier(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Json(input): Json<CreateCarrier>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::Carrier)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let carrier = CarrierRepo::create(&state.pool, &ctx, &input).await?;

    tracing::info!(user_id = %user.user_id, carrier_id = %carrier.id, "Carrier created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: carrier })))
}

/// GET /carriers/{id}
pub async fn get_carrier(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let carrier = CarrierRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Carrier",
                id,
            })
        })?;

    Ok(Json(DataResponse { data: carrier }))
}

/// GET /carriers/{id}/contacts
pub async fn list_carrier_contacts(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contacts = CarrierRepo::list_contacts(&state.pool, id).await?;
    Ok(Json(DataResponse { data: contacts }))
}

/// POST /carriers/{id}/contacts
pub async fn create_carrier_contact(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCarrierContact>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::CarrierContact)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // The parent carrier must exist; the contact row has a real FK.
    CarrierRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Carrier",
                id,
            })
        })?;

    let ctx = meta.audit_context(&user);
    let contact = CarrierRepo::create_contact(&state.pool, &ctx, id, &input).await?;

    tracing::info!(
        user_id = %user.user_id,
        carrier_id = %id,
        contact_id = %contact.id,
        "Carrier contact created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: contact })))
}
