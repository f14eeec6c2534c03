use crate::queries::event_queries;
use crate::{AppError, AppState};
use gala_domain::{ActivityRecord, EventId};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

/// Newest first.
pub async fn list_activity(
    state: &AppState,
    event_id: EventId,
    limit: Option<usize>,
) -> Result<Vec<ActivityRecord>, AppError> {
    event_queries::get_event(state, event_id).await?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let records = state.activity_repo.fetch_activity(event_id, limit).await?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::task_commands;
    use crate::test_support::{build_state, seed_event};
    use gala_domain::{ActivityKind, NewTask};

    #[tokio::test]
    async fn mutations_show_up_newest_first() {
        let state = build_state();
        let event = seed_event(&state).await;
        let task = task_commands::create_task(
            &state,
            event.id,
            NewTask {
                title: "Book DJ".to_string(),
                ..NewTask::default()
            },
        )
        .await
        .expect("task");

        let records = list_activity(&state, event.id, None).await.expect("activity");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, ActivityKind::TaskCreated.as_str());
        assert_eq!(records[0].subject_id, task.id.to_string());
        assert_eq!(records[1].kind, ActivityKind::EventCreated.as_str());

        let limited = list_activity(&state, event.id, Some(0)).await.expect("activity");
        assert_eq!(limited.len(), 1);
    }
}
