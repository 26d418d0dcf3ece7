//! Handlers for tasks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use sentinel_core::audit::EntityKind;
use sentinel_core::error::CoreError;
use sentinel_core::linked::LinkedEntity;
use sentinel_core::roles::{authorize, Action};
use sentinel_core::types::DbId;
use sentinel_db::models::task::{CreateTask, TaskListParams, UpdateTask};
use sentinel_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::meta::RequestMeta;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /tasks
///
/// List tasks; defaults to open tasks when no status filter is given.
pub async fn list_tasks(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> AppResult<impl IntoResponse> {
    let page = TaskRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// Query parameters for "my tasks".
#[derive(Debug, Deserialize)]
pub struct MyTaskParams {
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// GET /tasks/my
///
/// Tasks assigned to or created by the current user.
pub async fn my_tasks(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MyTaskParams>,
) -> AppResult<impl IntoResponse> {
    let tasks = TaskRepo::list_for_user(
        &state.pool,
        user.user_id,
        params.status.as_deref(),
        params.priority.as_deref(),
    )
    .await?;

    Ok(Json(DataResponse { data: tasks }))
}

/// POST /tasks
///
/// Create a task; defaults the assignee to the acting user.
pub async fn create_task(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Create, EntityKind::Task)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if let (Some(ref kind), Some(linked_id)) =
        (&input.linked_entity_type, input.linked_entity_id)
    {
        LinkedEntity::from_columns(kind, linked_id)?;
    }

    let ctx = meta.audit_context(&user);
    let task = TaskRepo::create(&state.pool, &ctx, &input).await?;

    tracing::info!(user_id = %user.user_id, task_id = %task.id, "Task created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// PUT /tasks/{id}
///
/// Update a task; completing it stamps `completed_at` in the same update.
pub async fn update_task(
    user: AuthUser,
    meta: RequestMeta,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<impl IntoResponse> {
    authorize(user.role, Action::Update, EntityKind::Task)?;
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ctx = meta.audit_context(&user);
    let task = TaskRepo::update(&state.pool, &ctx, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Task",
                id,
            })
        })?;

    tracing::info!(user_id = %user.user_id, task_id = %id, "Task updated");

    Ok(Json(DataResponse { data: task }))
}
