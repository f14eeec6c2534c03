// Task status value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Checkbox semantics: anything open becomes completed, completed reopens.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Completed => TaskStatus::Todo,
            TaskStatus::Todo | TaskStatus::InProgress => TaskStatus::Completed,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(DomainError::InvalidInput(format!("unknown task status '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!(" Completed ".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).expect("json");
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn toggle_flips_completion() {
        assert_eq!(TaskStatus::Todo.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Todo);
    }
}
