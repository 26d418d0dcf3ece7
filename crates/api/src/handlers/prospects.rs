//! Handlers for prospects: CRUD, pipeline moves, and conversion.
//!
//! Producers only see their own prospects; conversion into an account
//! succeeds exactly once per prospect.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use sentinel_core::audit::EntityKind;
use sentinel_core::error::CoreError;
use sentinel_core::roles::{authorize, producer_scope, Action, Role};
use sentinel_core::types::DbId;
use sentinel_db::models::prospect::{
    ConvertOutcome, CreateProspect, ProspectListParams, UpdateProspect, PIPELINE_STAGES,
};
use sentinel_db::repositories::ProspectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::meta::RequestMeta;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /prospects
///
/// List prospects with filters; Producers see only their own.
pub async fn list_prospects(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProspectListParams>,
) -> AppResult<impl IntoResponse> {
    let scope = producer_scope(user.role, user.user_id);
    let page = ProspectRepo::list(&state.pool, &params, scope).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /prospects/pipeline
///
/// Per-stage counts and values for the Kanban board, excluding closed stages.
pub async fn pipeline_summary(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let scope = producer_scope(user.role, user.user_id);
    let stages = ProspectRepo::pipeline_summary(&state.pool, scope).await?;
    Ok(Json(DataResponse { data: stages }))
}

/// POST /prospects
///
/// Create a prospect; defaults the assigned producer to the acting user.
pub async fn create_prospect(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Json(input): Json<CreateProspect>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::Prospect)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let prospect = ProspectRepo::create(&state.pool, &ctx, &input).await?;

    tracing::info!(user_id = %user.user_id, prospect_id = %prospect.id, "Prospect created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: prospect })))
}

/// GET /prospects/{id}
///
/// Fetch one prospect. Out-of-scope producers get Forbidden.
pub async fn get_prospect(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let prospect = ProspectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Prospect",
                id,
            })
        })?;

    if user.role == Role::Producer && prospect.assigned_producer_id != Some(user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden("Access denied".into())));
    }

    Ok(Json(DataResponse { data: prospect }))
}

/// PUT /prospects/{id}
///
/// Update a prospect; moving the pipeline stage to a closed stage stamps
/// `closed_at` in the same update.
pub async fn update_prospect(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProspect>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Update, EntityKind::Prospect)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let prospect = ProspectRepo::update(&state.pool, &ctx, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Prospect",
                id,
            })
        })?;

    tracing::info!(user_id = %user.user_id, prospect_id = %id, "Prospect updated");

    Ok(Json(DataResponse { data: prospect }))
}

/// Query parameter for the quick stage move.
#[derive(Debug, Deserialize)]
pub struct StageParams {
    pub stage: String,
}

/// PUT /prospects/{id}/stage?stage=
///
/// Quick stage move for Kanban drag-and-drop.
pub async fn update_stage(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<StageParams>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Update, EntityKind::Prospect)?;
    if !PIPELINE_STAGES.contains(&params.stage.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unknown pipeline stage: {}",
            params.stage
        )));
    }

    let ctx = meta.audit_context(&user);
    let prospect = ProspectRepo::update_stage(&state.pool, &ctx, id, &params.stage)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Prospect",
                id,
            })
        })?;

    tracing::info!(
        user_id = %user.user_id,
        prospect_id = %id,
        stage = %params.stage,
        "Pipeline stage updated"
    );

    Ok(Json(DataResponse { data: prospect }))
}

/// POST /prospects/{id}/convert
///
/// Convert a won prospect into an account. A second attempt on the same
/// prospect is a Conflict and creates nothing.
pub async fn convert_prospect(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::Account)?;

    let ctx = meta.audit_context(&user);
    match ProspectRepo::convert(&state.pool, &ctx, id).await? {
        ConvertOutcome::Converted(account) => {
            tracing::info!(
                user_id = %user.user_id,
                prospect_id = %id,
                account_id = %account.id,
                "Prospect converted to account"
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: account })))
        }
        ConvertOutcome::AlreadyConverted => Err(AppError::Core(CoreError::Conflict(
            "Prospect already converted".into(),
        ))),
        ConvertOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Prospect",
            id,
        })),
    }
}
