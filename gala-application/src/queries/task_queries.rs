use chrono::NaiveDate;
use serde::Deserialize;

use crate::queries::event_queries;
use crate::{AppError, AppState};
use gala_domain::services::{kanban, timeline};
use gala_domain::{BoardColumn, EventId, GanttView, Task, TaskId, TaskStatus, TimelineView, TimelineWindow};

#[derive(Debug, Default, Deserialize)]
pub struct TimelineRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub async fn get_task(state: &AppState, task_id: TaskId) -> Result<Task, AppError> {
    state
        .task_repo
        .fetch_task(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task {}", task_id)))
}

/// Tasks in board order: column by column, then by position.
pub async fn list_tasks(state: &AppState, event_id: EventId) -> Result<Vec<Task>, AppError> {
    event_queries::get_event(state, event_id).await?;
    let tasks = state.task_repo.list_tasks(event_id).await?;
    Ok(TaskStatus::ALL
        .iter()
        .flat_map(|status| kanban::column_tasks(&tasks, *status))
        .cloned()
        .collect())
}

pub async fn get_board(state: &AppState, event_id: EventId) -> Result<Vec<BoardColumn>, AppError> {
    event_queries::get_event(state, event_id).await?;
    let tasks = state.task_repo.list_tasks(event_id).await?;
    Ok(kanban::build_board(&tasks))
}

pub async fn get_timeline(
    state: &AppState,
    event_id: EventId,
    range: TimelineRange,
) -> Result<TimelineView, AppError> {
    let tasks = list_tasks(state, event_id).await?;
    let window = resolve_window(&tasks, range)?;
    let bars = window
        .map(|window| timeline::project_timeline(&tasks, &window))
        .unwrap_or_default();
    Ok(TimelineView { window, bars })
}

pub async fn get_gantt(
    state: &AppState,
    event_id: EventId,
    range: TimelineRange,
) -> Result<GanttView, AppError> {
    let tasks = list_tasks(state, event_id).await?;
    let window = resolve_window(&tasks, range)?;
    let rows = window
        .map(|window| timeline::project_gantt(&tasks, &window))
        .unwrap_or_default();
    Ok(GanttView { window, rows })
}

/// Missing bounds come from the tasks themselves. A derived bound never
/// crosses the supplied one, so a one-sided range past every task yields an
/// empty window instead of an inverted one.
fn resolve_window(tasks: &[Task], range: TimelineRange) -> Result<Option<TimelineWindow>, AppError> {
    let derived = timeline::derive_window(tasks);
    let window = match (range.from, range.to) {
        (Some(from), Some(to)) => Some(TimelineWindow::new(from, to)?),
        (Some(from), None) => {
            let max_date = derived.map_or(from, |window| window.max_date.max(from));
            Some(TimelineWindow::new(from, max_date)?)
        }
        (None, Some(to)) => {
            let min_date = derived.map_or(to, |window| window.min_date.min(to));
            Some(TimelineWindow::new(min_date, to)?)
        }
        (None, None) => derived,
    };
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::task_commands;
    use crate::test_support::{build_state, date, seed_event};
    use gala_domain::NewTask;

    fn dated(title: &str, category: &str, start: NaiveDate, due: NaiveDate) -> NewTask {
        NewTask {
            title: title.to_string(),
            category: Some(category.to_string()),
            start_date: Some(start),
            due_date: Some(due),
            ..NewTask::default()
        }
    }

    #[tokio::test]
    async fn timeline_derives_window_from_tasks() {
        let state = build_state();
        let event = seed_event(&state).await;
        task_commands::create_task(&state, event.id, dated("Venue", "venue", date(2030, 5, 1), date(2030, 5, 10)))
            .await
            .expect("task");
        task_commands::create_task(&state, event.id, dated("Food", "catering", date(2030, 5, 6), date(2030, 5, 10)))
            .await
            .expect("task");
        task_commands::create_task(
            &state,
            event.id,
            NewTask {
                title: "Undated".to_string(),
                ..NewTask::default()
            },
        )
        .await
        .expect("task");

        let view = get_timeline(&state, event.id, TimelineRange::default())
            .await
            .expect("timeline");
        let window = view.window.expect("window");
        assert_eq!(window.total_days(), 10);
        assert_eq!(view.bars.len(), 2);
        assert_eq!(view.bars[0].left_percent, 0.0);
        assert_eq!(view.bars[0].width_percent, 100.0);
        assert_eq!(view.bars[1].left_percent, 50.0);
        assert_eq!(view.bars[1].width_percent, 50.0);
    }

    #[tokio::test]
    async fn explicit_range_clips_and_drops_bars() {
        let state = build_state();
        let event = seed_event(&state).await;
        task_commands::create_task(&state, event.id, dated("Early", "venue", date(2030, 4, 1), date(2030, 4, 5)))
            .await
            .expect("task");
        task_commands::create_task(&state, event.id, dated("Span", "venue", date(2030, 4, 28), date(2030, 5, 3)))
            .await
            .expect("task");
        task_commands::create_task(&state, event.id, dated("Music", "music", date(2030, 5, 2), date(2030, 5, 2)))
            .await
            .expect("task");

        let range = TimelineRange {
            from: Some(date(2030, 5, 1)),
            to: Some(date(2030, 5, 4)),
        };
        let gantt = get_gantt(&state, event.id, range).await.expect("gantt");
        assert_eq!(gantt.rows.len(), 2);
        assert_eq!(gantt.rows[0].category, "venue");
        assert_eq!(gantt.rows[0].bars.len(), 1);
        assert!(gantt.rows[0].bars[0].clipped_start);
        assert_eq!(gantt.rows[0].bars[0].width_percent, 75.0);
        assert_eq!(gantt.rows[1].category, "music");
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let state = build_state();
        let event = seed_event(&state).await;
        let range = TimelineRange {
            from: Some(date(2030, 5, 4)),
            to: Some(date(2030, 5, 1)),
        };
        assert!(matches!(
            get_timeline(&state, event.id, range).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn one_sided_range_past_every_task_is_empty() {
        let state = build_state();
        let event = seed_event(&state).await;
        task_commands::create_task(&state, event.id, dated("Venue", "venue", date(2030, 5, 1), date(2030, 5, 3)))
            .await
            .expect("task");

        let after = TimelineRange {
            from: Some(date(2030, 6, 1)),
            to: None,
        };
        let view = get_timeline(&state, event.id, after).await.expect("timeline");
        let window = view.window.expect("window");
        assert_eq!((window.min_date, window.max_date), (date(2030, 6, 1), date(2030, 6, 1)));
        assert!(view.bars.is_empty());

        let before = TimelineRange {
            from: None,
            to: Some(date(2030, 4, 1)),
        };
        let gantt = get_gantt(&state, event.id, before).await.expect("gantt");
        assert_eq!(gantt.window.expect("window").max_date, date(2030, 4, 1));
        assert!(gantt.rows.is_empty());

        let overlapping = TimelineRange {
            from: Some(date(2030, 5, 2)),
            to: None,
        };
        let view = get_timeline(&state, event.id, overlapping).await.expect("timeline");
        assert_eq!(view.window.expect("window").max_date, date(2030, 5, 3));
        assert_eq!(view.bars.len(), 1);
    }

    #[tokio::test]
    async fn timeline_without_dated_tasks_has_no_window() {
        let state = build_state();
        let event = seed_event(&state).await;
        let view = get_timeline(&state, event.id, TimelineRange::default())
            .await
            .expect("timeline");
        assert!(view.window.is_none());
        assert!(view.bars.is_empty());
    }
}
