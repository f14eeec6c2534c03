// Task entity
// Planning items shown on the kanban board, timeline and gantt views.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::utils::{current_millis, normalize_optional_text};
use crate::value_objects::{EventId, Priority, TaskId, TaskStatus};

const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub event_id: EventId,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub category: String,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub position: i32,
    pub created_at: i64,
}

impl Task {
    /// Builds a task for `event_id`; the caller assigns the column position.
    pub fn create(event_id: EventId, input: NewTask, position: i32) -> DomainResult<Self> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::InvalidInput("task title is required".to_string()));
        }
        let task = Self {
            id: TaskId::new(),
            event_id,
            title,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            category: normalize_category(input.category),
            start_date: input.start_date,
            start_time: input.start_time,
            due_date: input.due_date,
            due_time: input.due_time,
            notes: normalize_optional_text(input.notes),
            tags: normalize_tags(input.tags),
            position,
            created_at: current_millis(),
        };
        task.validate_schedule()?;
        Ok(task)
    }

    /// Due must not precede start. Times only break ties on the same day.
    pub fn validate_schedule(&self) -> DomainResult<()> {
        let (Some(start), Some(due)) = (self.start_date, self.due_date) else {
            return Ok(());
        };
        if due < start {
            return Err(DomainError::InvalidInput(format!(
                "due date {} is before start date {}",
                due, start
            )));
        }
        if due == start {
            if let (Some(start_time), Some(due_time)) = (self.start_time, self.due_time) {
                if due_time < start_time {
                    return Err(DomainError::InvalidInput(format!(
                        "due time {} is before start time {}",
                        due_time, start_time
                    )));
                }
            }
        }
        Ok(())
    }

    /// Applies field edits; status moves are handled by the kanban service.
    pub fn apply(&mut self, patch: TaskPatch) -> DomainResult<()> {
        if let Some(title) = normalize_optional_text(patch.title) {
            self.title = title;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if patch.category.is_some() {
            self.category = normalize_category(patch.category);
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(due_time) = patch.due_time {
            self.due_time = due_time;
        }
        if patch.notes.is_some() {
            self.notes = normalize_optional_text(patch.notes);
        }
        if let Some(tags) = patch.tags {
            self.tags = normalize_tags(tags);
        }
        self.validate_schedule()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewTask {
    pub title: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    /// `Some(None)` (an explicit `null`) clears the field; absent leaves it.
    #[serde(deserialize_with = "present")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(deserialize_with = "present")]
    pub start_time: Option<Option<NaiveTime>>,
    #[serde(deserialize_with = "present")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(deserialize_with = "present")]
    pub due_time: Option<Option<NaiveTime>>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveTaskRequest {
    pub status: TaskStatus,
    pub index: usize,
}

/// A position rewrite produced by the kanban service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionChange {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub position: i32,
}

fn normalize_category(value: Option<String>) -> String {
    normalize_optional_text(value)
        .map(|category| category.to_lowercase())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = tags
        .into_iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn create_fills_defaults() {
        let input = NewTask {
            title: " Book venue ".to_string(),
            tags: vec!["Venue".to_string(), "venue".to_string(), " ".to_string()],
            ..NewTask::default()
        };
        let task = Task::create(EventId::new(), input, 3).expect("task");
        assert_eq!(task.title, "Book venue");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, "general");
        assert_eq!(task.tags, vec!["venue".to_string()]);
        assert_eq!(task.position, 3);
    }

    #[test]
    fn due_before_start_is_rejected() {
        let input = NewTask {
            title: "Order cake".to_string(),
            start_date: Some(date(2026, 3, 10)),
            due_date: Some(date(2026, 3, 9)),
            ..NewTask::default()
        };
        assert!(Task::create(EventId::new(), input, 0).is_err());
    }

    #[test]
    fn same_day_compares_times() {
        let input = NewTask {
            title: "Sound check".to_string(),
            start_date: Some(date(2026, 3, 10)),
            start_time: NaiveTime::from_hms_opt(15, 0, 0),
            due_date: Some(date(2026, 3, 10)),
            due_time: NaiveTime::from_hms_opt(14, 0, 0),
            ..NewTask::default()
        };
        assert!(Task::create(EventId::new(), input, 0).is_err());
    }

    #[test]
    fn patch_revalidates_schedule() {
        let input = NewTask {
            title: "Send invites".to_string(),
            start_date: Some(date(2026, 3, 1)),
            due_date: Some(date(2026, 3, 5)),
            ..NewTask::default()
        };
        let mut task = Task::create(EventId::new(), input, 0).expect("task");
        let patch = TaskPatch {
            due_date: Some(Some(date(2026, 2, 1))),
            ..TaskPatch::default()
        };
        assert!(task.apply(patch).is_err());
    }

    #[test]
    fn null_patch_fields_clear_dates() {
        let input = NewTask {
            title: "Rent chairs".to_string(),
            start_date: Some(date(2026, 3, 1)),
            due_date: Some(date(2026, 3, 5)),
            due_time: NaiveTime::from_hms_opt(9, 0, 0),
            ..NewTask::default()
        };
        let mut task = Task::create(EventId::new(), input, 0).expect("task");

        let patch: TaskPatch =
            serde_json::from_str(r#"{"due_date": null, "due_time": null, "title": "Rent tables"}"#).expect("patch");
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.start_date, None);
        task.apply(patch).expect("apply");
        assert_eq!(task.title, "Rent tables");
        assert_eq!(task.start_date, Some(date(2026, 3, 1)));
        assert_eq!(task.due_date, None);
        assert_eq!(task.due_time, None);
    }
}
