//! Handlers for notes and communication logs.
//!
//! Both attach polymorphically to any entity; the linked entity type is
//! validated against the known set, but the target row's existence is not
//! checked at write time.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use sentinel_core::audit::EntityKind;
use sentinel_core::linked::LinkedEntity;
use sentinel_core::roles::{authorize, Action};
use sentinel_db::models::note::{CreateCommunicationLog, CreateNote, LinkedEntityParams};
use sentinel_db::repositories::{CommLogRepo, NoteRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::meta::RequestMeta;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /notes?linked_entity_type=&linked_entity_id=
pub async fn list_notes(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LinkedEntityParams>,
) -> AppResult<impl IntoResponse> {
    LinkedEntity::from_columns(&params.linked_entity_type, params.linked_entity_id)?;

    let notes = NoteRepo::list_by_linked(
        &state.pool,
        &params.linked_entity_type,
        params.linked_entity_id,
    )
    .await?;

    Ok(Json(DataResponse { data: notes }))
}

/// POST /notes
pub async fn create_note(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Json(input): Json<CreateNote>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::Note)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    LinkedEntity::from_columns(&input.linked_entity_type, input.linked_entity_id)?;

    let ctx = meta.audit_context(&user);
    let note = NoteRepo::create(&state.pool, &ctx, &input).await?;

    tracing::info!(user_id = %user.user_id, note_id = %note.id, "Note created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// GET /comm-logs?linked_entity_type=&linked_entity_id=&channel=
pub async fn list_comm_logs(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LinkedEntityParams>,
) -> AppResult<impl IntoResponse> {
    LinkedEntity::from_columns(&params.linked_entity_type, params.linked_entity_id)?;

    let logs = CommLogRepo::list_by_linked(
        &state.pool,
        &params.linked_entity_type,
        params.linked_entity_id,
        params.channel.as_deref(),
    )
    .await?;

    Ok(Json(DataResponse { data: logs }))
}

/// POST /comm-logs
pub async fn create_comm_log(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Json(input): Json<CreateCommunicationLog>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::CommunicationLog)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    LinkedEntity::from_columns(&input.linked_entity_type, input.linked_entity_id)?;

    let ctx = meta.audit_context(&user);
    let log = CommLogRepo::create(&state.pool, &ctx, &input).await?;

    tracing::info!(user_id = %user.user_id, comm_log_id = %log.id, "Communication logged");

    Ok((StatusCode::CREATED, Json(DataResponse { data: log })))
}
