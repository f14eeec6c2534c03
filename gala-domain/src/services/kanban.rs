//! Kanban position bookkeeping.
//!
//! Positions are contiguous (`0..n`) inside each `(event, status)` partition.
//! Every operation here works on one event's tasks and returns only the rows
//! whose status or position actually changed.

use serde::Serialize;

use crate::entities::{PositionChange, Task};
use crate::error::{DomainError, DomainResult};
use crate::value_objects::{TaskId, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KanbanColumn {
    pub id: TaskStatus,
    pub title: String,
    pub color: String,
    pub deletable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    #[serde(flatten)]
    pub column: KanbanColumn,
    pub tasks: Vec<Task>,
}

pub fn default_columns() -> Vec<KanbanColumn> {
    TaskStatus::ALL
        .iter()
        .map(|status| {
            let (title, color) = match status {
                TaskStatus::Todo => ("To Do", "#64748b"),
                TaskStatus::InProgress => ("In Progress", "#f59e0b"),
                TaskStatus::Completed => ("Completed", "#10b981"),
            };
            KanbanColumn {
                id: *status,
                title: title.to_string(),
                color: color.to_string(),
                deletable: false,
            }
        })
        .collect()
}

/// Tasks of one column in display order.
pub fn column_tasks(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    let mut column: Vec<&Task> = tasks.iter().filter(|task| task.status == status).collect();
    column.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
    column
}

pub fn next_position(tasks: &[Task], status: TaskStatus) -> i32 {
    tasks
        .iter()
        .filter(|task| task.status == status)
        .map(|task| task.position)
        .max()
        .map_or(0, |position| position + 1)
}

fn collect_changes(ordered: &[&Task], status: TaskStatus, changes: &mut Vec<PositionChange>) {
    for (index, task) in ordered.iter().enumerate() {
        let position = index as i32;
        if task.position != position || task.status != status {
            changes.push(PositionChange {
                task_id: task.id,
                status,
                position,
            });
        }
    }
}

/// Rewrites every column to contiguous positions, keeping display order.
pub fn normalize_positions(tasks: &[Task]) -> Vec<PositionChange> {
    let mut changes = Vec::new();
    for status in TaskStatus::ALL {
        collect_changes(&column_tasks(tasks, status), status, &mut changes);
    }
    changes
}

/// Moves `task_id` to `to_index` of the `to_status` column. An index past the
/// end appends.
pub fn move_task(
    tasks: &[Task],
    task_id: TaskId,
    to_status: TaskStatus,
    to_index: usize,
) -> DomainResult<Vec<PositionChange>> {
    let moving = tasks
        .iter()
        .find(|task| task.id == task_id)
        .ok_or_else(|| DomainError::NotFound(format!("task {}", task_id)))?;
    let from_status = moving.status;

    let mut source: Vec<&Task> = column_tasks(tasks, from_status)
        .into_iter()
        .filter(|task| task.id != task_id)
        .collect();
    let mut changes = Vec::new();

    if from_status == to_status {
        let index = to_index.min(source.len());
        source.insert(index, moving);
        collect_changes(&source, to_status, &mut changes);
    } else {
        collect_changes(&source, from_status, &mut changes);
        let mut destination = column_tasks(tasks, to_status);
        let index = to_index.min(destination.len());
        destination.insert(index, moving);
        collect_changes(&destination, to_status, &mut changes);
    }
    Ok(changes)
}

pub fn apply_changes(tasks: &mut [Task], changes: &[PositionChange]) {
    for change in changes {
        if let Some(task) = tasks.iter_mut().find(|task| task.id == change.task_id) {
            task.status = change.status;
            task.position = change.position;
        }
    }
}

pub fn build_board(tasks: &[Task]) -> Vec<BoardColumn> {
    default_columns()
        .into_iter()
        .map(|column| {
            let tasks = column_tasks(tasks, column.id).into_iter().cloned().collect();
            BoardColumn { column, tasks }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewTask;
    use crate::value_objects::EventId;

    fn board(event_id: EventId, statuses: &[(TaskStatus, usize)]) -> Vec<Task> {
        let mut tasks = Vec::new();
        for (status, count) in statuses {
            for index in 0..*count {
                let input = NewTask {
                    title: format!("{}-{}", status, index),
                    status: Some(*status),
                    ..NewTask::default()
                };
                tasks.push(Task::create(event_id, input, index as i32).expect("task"));
            }
        }
        tasks
    }

    fn positions(tasks: &[Task], status: TaskStatus) -> Vec<(String, i32)> {
        column_tasks(tasks, status)
            .into_iter()
            .map(|task| (task.title.clone(), task.position))
            .collect()
    }

    fn assert_contiguous(tasks: &[Task]) {
        for status in TaskStatus::ALL {
            let column = column_tasks(tasks, status);
            for (index, task) in column.iter().enumerate() {
                assert_eq!(task.position, index as i32, "column {}", status);
            }
        }
    }

    #[test]
    fn move_within_column_keeps_positions_contiguous() {
        let event_id = EventId::new();
        for from in 0..5 {
            for to in 0..6 {
                let mut tasks = board(event_id, &[(TaskStatus::Todo, 5)]);
                let moving = column_tasks(&tasks, TaskStatus::Todo)[from].id;
                let changes = move_task(&tasks, moving, TaskStatus::Todo, to).expect("move");
                apply_changes(&mut tasks, &changes);
                assert_contiguous(&tasks);
                let landed = column_tasks(&tasks, TaskStatus::Todo)
                    .iter()
                    .position(|task| task.id == moving)
                    .expect("present");
                assert_eq!(landed, to.min(4));
            }
        }
    }

    #[test]
    fn move_down_reports_only_shifted_rows() {
        let mut tasks = board(EventId::new(), &[(TaskStatus::Todo, 4)]);
        let moving = column_tasks(&tasks, TaskStatus::Todo)[0].id;
        let changes = move_task(&tasks, moving, TaskStatus::Todo, 2).expect("move");
        assert_eq!(changes.len(), 3);
        apply_changes(&mut tasks, &changes);
        assert_eq!(
            positions(&tasks, TaskStatus::Todo),
            vec![
                ("todo-1".to_string(), 0),
                ("todo-2".to_string(), 1),
                ("todo-0".to_string(), 2),
                ("todo-3".to_string(), 3),
            ]
        );
    }

    #[test]
    fn move_across_columns_closes_gap_and_inserts() {
        let mut tasks = board(
            EventId::new(),
            &[(TaskStatus::Todo, 3), (TaskStatus::InProgress, 2)],
        );
        let moving = column_tasks(&tasks, TaskStatus::Todo)[1].id;
        let changes = move_task(&tasks, moving, TaskStatus::InProgress, 1).expect("move");
        apply_changes(&mut tasks, &changes);
        assert_contiguous(&tasks);
        assert_eq!(
            positions(&tasks, TaskStatus::Todo),
            vec![("todo-0".to_string(), 0), ("todo-2".to_string(), 1)]
        );
        assert_eq!(
            positions(&tasks, TaskStatus::InProgress),
            vec![
                ("in-progress-0".to_string(), 0),
                ("todo-1".to_string(), 1),
                ("in-progress-1".to_string(), 2),
            ]
        );
    }

    #[test]
    fn move_into_empty_column_appends() {
        let mut tasks = board(EventId::new(), &[(TaskStatus::Todo, 2)]);
        let moving = column_tasks(&tasks, TaskStatus::Todo)[0].id;
        let changes = move_task(&tasks, moving, TaskStatus::Completed, 10).expect("move");
        apply_changes(&mut tasks, &changes);
        assert_eq!(positions(&tasks, TaskStatus::Completed), vec![("todo-0".to_string(), 0)]);
        assert_contiguous(&tasks);
    }

    #[test]
    fn unknown_task_is_not_found() {
        let tasks = board(EventId::new(), &[(TaskStatus::Todo, 1)]);
        let err = move_task(&tasks, TaskId::new(), TaskStatus::Todo, 0).expect_err("missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn normalize_closes_gaps_and_duplicates() {
        let mut tasks = board(EventId::new(), &[(TaskStatus::Todo, 3)]);
        tasks[0].position = 4;
        tasks[1].position = 4;
        tasks[2].position = 9;
        let changes = normalize_positions(&tasks);
        apply_changes(&mut tasks, &changes);
        assert_contiguous(&tasks);
        assert_eq!(next_position(&tasks, TaskStatus::Todo), 3);
        assert_eq!(next_position(&tasks, TaskStatus::Completed), 0);
    }

    #[test]
    fn board_has_three_fixed_columns() {
        let tasks = board(EventId::new(), &[(TaskStatus::Completed, 2)]);
        let columns = build_board(&tasks);
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(|column| !column.column.deletable));
        assert_eq!(columns[2].tasks.len(), 2);
        assert!(columns[0].tasks.is_empty());
    }
}
