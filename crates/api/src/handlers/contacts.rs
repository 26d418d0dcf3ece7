//! Handlers for contacts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use sentinel_core::audit::EntityKind;
use sentinel_core::error::CoreError;
use sentinel_core::roles::{authorize, Action};
use sentinel_core::types::DbId;
use sentinel_db::models::contact::{CreateContact, UpdateContact};
use sentinel_db::repositories::ContactRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::meta::RequestMeta;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /contacts
///
/// Create a new contact under an account.
pub async fn create_contact(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Json(input): Json<CreateContact>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::Contact)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let contact = ContactRepo::create(&state.pool, &ctx, &input).await?;

    tracing::info!(user_id = %user.user_id, contact_id = %contact.id, "Contact created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: contact })))
}

/// GET /contacts/{id}
pub async fn get_contact(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contact = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Contact",
                id,
            })
        })?;

    Ok(Json(DataResponse { data: contact }))
}

/// PUT /contacts/{id}
///
/// Update a contact; only actually-changed fields are written and audited.
pub async fn update_contact(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContact>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Update, EntityKind::Contact)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let contact = ContactRepo::update(&state.pool, &ctx, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Contact",
                id,
            })
        })?;

    tracing::info!(user_id = %user.user_id, contact_id = %id, "Contact updated");

    Ok(Json(DataResponse { data: contact }))
}
