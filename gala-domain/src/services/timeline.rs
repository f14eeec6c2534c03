//! Timeline and gantt bar placement.
//!
//! A bar's left offset and width are percentages of the visible window,
//! counted in whole inclusive days. Bars never depend on each other, so the
//! projection keeps input order and needs no tie-break.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::Task;
use crate::error::{DomainError, DomainResult};
use crate::value_objects::{Priority, TaskId, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineWindow {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl TimelineWindow {
    pub fn new(min_date: NaiveDate, max_date: NaiveDate) -> DomainResult<Self> {
        if max_date < min_date {
            return Err(DomainError::InvalidInput(format!(
                "timeline window ends ({}) before it starts ({})",
                max_date, min_date
            )));
        }
        Ok(Self { min_date, max_date })
    }

    pub fn total_days(&self) -> i64 {
        (self.max_date - self.min_date).num_days() + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBar {
    pub task_id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub category: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub left_percent: f64,
    pub width_percent: f64,
    pub clipped_start: bool,
    pub clipped_end: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineView {
    pub window: Option<TimelineWindow>,
    pub bars: Vec<TimelineBar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GanttRow {
    pub category: String,
    pub bars: Vec<TimelineBar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GanttView {
    pub window: Option<TimelineWindow>,
    pub rows: Vec<GanttRow>,
}

/// A task with only one of its dates set is a single-day bar.
fn task_span(task: &Task) -> Option<(NaiveDate, NaiveDate)> {
    match (task.start_date, task.due_date) {
        (Some(start), Some(due)) => Some((start, due)),
        (Some(day), None) | (None, Some(day)) => Some((day, day)),
        (None, None) => None,
    }
}

/// Smallest window covering every dated task.
pub fn derive_window(tasks: &[Task]) -> Option<TimelineWindow> {
    let mut spans = tasks.iter().filter_map(task_span);
    let (mut min_date, mut max_date) = spans.next()?;
    for (start, due) in spans {
        min_date = min_date.min(start).min(due);
        max_date = max_date.max(start).max(due);
    }
    Some(TimelineWindow { min_date, max_date })
}

pub fn project_bar(task: &Task, window: &TimelineWindow) -> Option<TimelineBar> {
    let (start, due) = task_span(task)?;
    if due < window.min_date || start > window.max_date {
        return None;
    }
    let clamped_start = start.max(window.min_date);
    let clamped_end = due.min(window.max_date);
    let duration = (clamped_end - clamped_start).num_days() + 1;
    if duration <= 0 {
        return None;
    }
    let total = window.total_days() as f64;
    let offset = (clamped_start - window.min_date).num_days() as f64;
    Some(TimelineBar {
        task_id: task.id,
        title: task.title.clone(),
        status: task.status,
        priority: task.priority,
        category: task.category.clone(),
        start_date: start,
        due_date: due,
        left_percent: offset / total * 100.0,
        width_percent: duration as f64 / total * 100.0,
        clipped_start: start < window.min_date,
        clipped_end: due > window.max_date,
    })
}

pub fn project_timeline(tasks: &[Task], window: &TimelineWindow) -> Vec<TimelineBar> {
    tasks
        .iter()
        .filter_map(|task| project_bar(task, window))
        .collect()
}

/// Groups bars by category, rows ordered by first appearance.
pub fn project_gantt(tasks: &[Task], window: &TimelineWindow) -> Vec<GanttRow> {
    let mut rows: Vec<GanttRow> = Vec::new();
    for bar in project_timeline(tasks, window) {
        match rows.iter_mut().find(|row| row.category == bar.category) {
            Some(row) => row.bars.push(bar),
            None => rows.push(GanttRow {
                category: bar.category.clone(),
                bars: vec![bar],
            }),
        }
    }
    rows
}
