use tracing::{info, warn};

use crate::activity;
use crate::queries::{event_queries, task_queries};
use crate::{AppError, AppState};
use gala_domain::services::kanban;
use gala_domain::{
    ActivityKind,
    ActivityRecord,
    BoardColumn,
    EventId,
    MoveTaskRequest,
    NewTask,
    PositionChange,
    Task,
    TaskId,
    TaskPatch,
    TaskStatus,
};

pub async fn create_task(state: &AppState, event_id: EventId, payload: NewTask) -> Result<Task, AppError> {
    event_queries::get_event(state, event_id).await?;
    let _guard = state.board_lock.lock().await;
    let existing = state.task_repo.list_tasks(event_id).await?;
    let status = payload.status.unwrap_or_default();
    let task = Task::create(event_id, payload, kanban::next_position(&existing, status))?;
    state.task_repo.insert_tasks(std::slice::from_ref(&task)).await?;
    state.metrics.record_tasks_written(1);
    activity::record_one(
        state,
        ActivityRecord::new(event_id, ActivityKind::TaskCreated, task.id, task.title.clone()),
    )
    .await;
    Ok(task)
}

/// Appends a batch of tasks, each at the end of its column. Entries that fail
/// validation are skipped.
pub async fn import_tasks(
    state: &AppState,
    event_id: EventId,
    payloads: Vec<NewTask>,
) -> Result<Vec<Task>, AppError> {
    let _guard = state.board_lock.lock().await;
    let mut board = state.task_repo.list_tasks(event_id).await?;
    let existing = board.len();
    for payload in payloads {
        let status = payload.status.unwrap_or_default();
        let title = payload.title.clone();
        match Task::create(event_id, payload, kanban::next_position(&board, status)) {
            Ok(task) => board.push(task),
            Err(err) => warn!(event_id = %event_id, title = %title, "skipping imported task: {}", err),
        }
    }
    let imported = board.split_off(existing);
    if imported.is_empty() {
        return Ok(imported);
    }
    state.task_repo.insert_tasks(&imported).await?;
    state.metrics.record_tasks_written(imported.len());
    activity::record(
        state,
        imported
            .iter()
            .map(|task| ActivityRecord::new(event_id, ActivityKind::TaskCreated, task.id, task.title.clone()))
            .collect(),
    )
    .await;
    Ok(imported)
}

/// Field edits; a status change moves the task to the end of its new column.
pub async fn update_task(state: &AppState, task_id: TaskId, mut patch: TaskPatch) -> Result<Task, AppError> {
    let _guard = state.board_lock.lock().await;
    let mut task = task_queries::get_task(state, task_id).await?;
    let to_status = patch.status.take().filter(|status| *status != task.status);
    task.apply(patch)?;
    let task = match to_status {
        Some(status) => change_status(state, task, status).await?,
        None => {
            state.task_repo.update_task(&task).await?;
            task
        }
    };
    state.metrics.record_tasks_written(1);
    activity::record_one(
        state,
        ActivityRecord::new(task.event_id, ActivityKind::TaskUpdated, task.id, task.title.clone()),
    )
    .await;
    Ok(task)
}

pub async fn toggle_task_status(state: &AppState, task_id: TaskId) -> Result<Task, AppError> {
    let _guard = state.board_lock.lock().await;
    let task = task_queries::get_task(state, task_id).await?;
    let from_status = task.status;
    let task = change_status(state, task, from_status.toggled()).await?;
    activity::record_one(
        state,
        ActivityRecord::new(
            task.event_id,
            ActivityKind::TaskMoved,
            task.id,
            format!("{} -> {}", from_status, task.status),
        ),
    )
    .await;
    Ok(task)
}

/// Drag-and-drop reorder. Returns the board after the move.
pub async fn move_task(
    state: &AppState,
    task_id: TaskId,
    request: MoveTaskRequest,
) -> Result<Vec<BoardColumn>, AppError> {
    let _guard = state.board_lock.lock().await;
    let task = task_queries::get_task(state, task_id).await?;
    let mut tasks = state.task_repo.list_tasks(task.event_id).await?;
    let changes = kanban::move_task(&tasks, task_id, request.status, request.index)?;
    if !changes.is_empty() {
        state.task_repo.update_positions(&changes).await?;
    }
    kanban::apply_changes(&mut tasks, &changes);
    state.metrics.record_task_move();
    info!(
        task_id = %task_id,
        status = %request.status,
        index = request.index,
        rewritten = changes.len(),
        "task moved"
    );
    activity::record_one(
        state,
        ActivityRecord::new(
            task.event_id,
            ActivityKind::TaskMoved,
            task_id,
            format!("{} -> {}#{}", task.status, request.status, request.index),
        ),
    )
    .await;
    Ok(kanban::build_board(&tasks))
}

/// Deletes the task and closes the gap it leaves in its column.
pub async fn delete_task(state: &AppState, task_id: TaskId) -> Result<(), AppError> {
    let _guard = state.board_lock.lock().await;
    let task = task_queries::get_task(state, task_id).await?;
    if !state.task_repo.delete_task(task_id).await? {
        return Err(AppError::NotFound(format!("task {}", task_id)));
    }
    let remaining = state.task_repo.list_tasks(task.event_id).await?;
    let changes = kanban::normalize_positions(&remaining);
    if !changes.is_empty() {
        state.task_repo.update_positions(&changes).await?;
    }
    activity::record_one(
        state,
        ActivityRecord::new(task.event_id, ActivityKind::TaskDeleted, task_id, task.title),
    )
    .await;
    Ok(())
}

/// Caller must hold `board_lock`.
async fn change_status(state: &AppState, mut task: Task, to_status: TaskStatus) -> Result<Task, AppError> {
    let tasks = state.task_repo.list_tasks(task.event_id).await?;
    let changes = kanban::move_task(&tasks, task.id, to_status, usize::MAX)?;
    if let Some(own) = changes.iter().find(|change| change.task_id == task.id) {
        task.status = own.status;
        task.position = own.position;
    }
    state.task_repo.update_task(&task).await?;
    let others: Vec<PositionChange> = changes
        .into_iter()
        .filter(|change| change.task_id != task.id)
        .collect();
    if !others.is_empty() {
        state.task_repo.update_positions(&others).await?;
    }
    Ok(task)
}
