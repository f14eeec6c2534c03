use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use gala_application::commands::task_commands;
use gala_application::queries::task_queries::{self, TimelineRange};
use gala_application::AppState;
use gala_domain::{
    BoardColumn,
    EventId,
    GanttView,
    MoveTaskRequest,
    NewTask,
    Task,
    TaskId,
    TaskPatch,
    TimelineView,
};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<Vec<Task>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(task_queries::list_tasks(&state, event_id).await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Json(payload): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let task = task_commands::create_task(&state, event_id, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_board(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<Vec<BoardColumn>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(task_queries::get_board(&state, event_id).await?))
}

pub async fn get_timeline(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Query(range): Query<TimelineRange>,
) -> Result<Json<TimelineView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(task_queries::get_timeline(&state, event_id, range).await?))
}

pub async fn get_gantt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Query(range): Query<TimelineRange>,
) -> Result<Json<GanttView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(task_queries::get_gantt(&state, event_id, range).await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<TaskId>,
) -> Result<Json<Task>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(task_queries::get_task(&state, task_id).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<TaskId>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(task_commands::update_task(&state, task_id, patch).await?))
}

pub async fn toggle_task_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<TaskId>,
) -> Result<Json<Task>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(task_commands::toggle_task_status(&state, task_id).await?))
}

pub async fn move_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<TaskId>,
    Json(request): Json<MoveTaskRequest>,
) -> Result<Json<Vec<BoardColumn>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(task_commands::move_task(&state, task_id, request).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<TaskId>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    task_commands::delete_task(&state, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
