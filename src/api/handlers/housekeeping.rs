//! Housekeeping task endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use chrono::Utc;
use tracing::info;

use crate::api::request::{AssignedTasksRequest, IdRequest, TaskStatusRequest, UpdateTaskRequest, ValidJson};
use crate::api::response::{ApiResponse, ApiResult};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::db::NewTask;
use crate::models::{HousekeepingTask, TaskListing, TaskStatus};

use super::MANAGEMENT;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/housekeeping/task", post(create))
        .route("/housekeeping/task/list", get(list))
        .route("/assigned/task", post(list_assigned))
        .route("/housekeeping/task/update", post(update))
        .route("/housekeeping/task_status/update", post(set_status))
        .route("/housekeeping/task/delete", post(delete))
}

async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<HousekeepingTask> {
    caller.require_any(MANAGEMENT)?;
    let Json(task) = payload?;
    let task = state.db().tasks().create(task).await?;
    info!(task_id = task.id, room_id = task.room_id, assigned_to = task.assigned_to, "Housekeeping task created");
    Ok(ApiResponse::created("Housekeeping task created successfully", task))
}

async fn list(State(state): State<AppState>, _caller: AuthUser) -> ApiResult<Vec<TaskListing>> {
    let tasks = state.db().tasks().find_all().await?;
    Ok(ApiResponse::ok("Housekeeping tasks retrieved successfully", tasks))
}

async fn list_assigned(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<AssignedTasksRequest>,
) -> ApiResult<Vec<TaskListing>> {
    let assignee = request.assigned_to.unwrap_or(caller.id);
    if assignee != caller.id {
        caller.require_any(MANAGEMENT)?;
    }
    let tasks = state.db().tasks().find_by_assignee(assignee).await?;
    Ok(ApiResponse::ok("Assigned tasks retrieved successfully", tasks))
}

async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<UpdateTaskRequest>,
) -> ApiResult<HousekeepingTask> {
    caller.require_any(MANAGEMENT)?;
    let task = state.db().tasks().update(request.id, request.changes).await?;
    info!(task_id = task.id, "Housekeeping task updated");
    Ok(ApiResponse::ok("Housekeeping task updated successfully", task))
}

async fn set_status(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<TaskStatusRequest>,
) -> ApiResult<HousekeepingTask> {
    caller.require_any(MANAGEMENT)?;
    let status: TaskStatus = request.status.parse()?;
    let task = state.db().tasks().set_status_manual(request.id, status, Utc::now()).await?;
    info!(task_id = task.id, status = %task.task_status, set_by = caller.id, "Task status set manually");
    Ok(ApiResponse::ok("Task status updated successfully", task))
}

async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<IdRequest>,
) -> ApiResult<()> {
    caller.require_any(MANAGEMENT)?;
    state.db().tasks().delete(request.id).await?;
    info!(task_id = request.id, "Housekeeping task deleted");
    Ok(ApiResponse::message("Housekeeping task deleted successfully"))
}
