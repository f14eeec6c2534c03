use tracing::info;

use crate::activity;
use crate::queries::event_queries;
use crate::{AppError, AppState};
use gala_domain::{generate_invite_code, ActivityKind, ActivityRecord, Event, EventId, EventPatch, NewEvent};

const INVITE_CODE_ATTEMPTS: usize = 5;

pub async fn create_event(state: &AppState, payload: NewEvent) -> Result<Event, AppError> {
    let mut event = Event::create(payload)?;
    event.invite_code = unique_invite_code(state, &event.invite_code).await?;
    state.event_repo.insert_event(&event).await?;
    state.metrics.record_event_created();
    info!(event_id = %event.id, owner = %event.owner_id, "event created");
    activity::record_one(
        state,
        ActivityRecord::new(event.id, ActivityKind::EventCreated, event.id, event.name.clone()),
    )
    .await;
    Ok(event)
}

pub async fn update_event(
    state: &AppState,
    event_id: EventId,
    patch: EventPatch,
) -> Result<Event, AppError> {
    let mut event = event_queries::get_event(state, event_id).await?;
    event.apply(patch)?;
    state.event_repo.update_event(&event).await?;
    activity::record_one(
        state,
        ActivityRecord::new(event.id, ActivityKind::EventUpdated, event.id, event.name.clone()),
    )
    .await;
    Ok(event)
}

/// Removes the event and everything attached to it. The activity log is kept.
pub async fn delete_event(state: &AppState, event_id: EventId) -> Result<(), AppError> {
    let event = event_queries::get_event(state, event_id).await?;
    if !state.event_repo.delete_event(event_id).await? {
        return Err(AppError::NotFound(format!("event {}", event_id)));
    }
    state.timer_hub.forget(event_id).await;
    info!(event_id = %event_id, "event deleted");
    activity::record_one(
        state,
        ActivityRecord::new(event_id, ActivityKind::EventDeleted, event_id, event.name),
    )
    .await;
    Ok(())
}

async fn unique_invite_code(state: &AppState, first: &str) -> Result<String, AppError> {
    let mut candidate = first.to_string();
    for _ in 0..INVITE_CODE_ATTEMPTS {
        if state
            .event_repo
            .fetch_event_by_invite_code(&candidate)
            .await?
            .is_none()
        {
            return Ok(candidate);
        }
        candidate = generate_invite_code();
    }
    Err(AppError::Conflict("could not allocate a unique invite code".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::task_commands;
    use crate::test_support::{build_state, date, seed_event};
    use gala_domain::{NewTask, UserId};

    #[tokio::test]
    async fn create_event_validates_and_issues_invite_code() {
        let state = build_state();
        let event = seed_event(&state).await;
        assert_eq!(event.invite_code.len(), 8);
        assert_eq!(event.event_type, "gala");

        let err = create_event(
            &state,
            NewEvent {
                owner_id: UserId("user-1".to_string()),
                name: "  ".to_string(),
                event_type: String::new(),
                date: date(2030, 1, 1),
                time: None,
                location: Default::default(),
                budget: 0.0,
                guest_estimate: 0,
                is_public: true,
            },
        )
        .await
        .expect_err("blank name");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_event_applies_patch() {
        let state = build_state();
        let event = seed_event(&state).await;
        let updated = update_event(
            &state,
            event.id,
            EventPatch {
                budget: Some(2500.0),
                is_public: Some(true),
                ..EventPatch::default()
            },
        )
        .await
        .expect("update");
        assert_eq!(updated.budget, 2500.0);
        assert!(updated.is_public);
        assert_eq!(updated.name, event.name);

        let err = update_event(
            &state,
            event.id,
            EventPatch {
                budget: Some(-1.0),
                ..EventPatch::default()
            },
        )
        .await
        .expect_err("negative budget");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn delete_event_cascades() {
        let state = build_state();
        let event = seed_event(&state).await;
        task_commands::create_task(
            &state,
            event.id,
            NewTask {
                title: "Flowers".to_string(),
                ..NewTask::default()
            },
        )
        .await
        .expect("task");

        delete_event(&state, event.id).await.expect("delete");
        assert!(state.task_repo.list_tasks(event.id).await.expect("tasks").is_empty());
        let log = state.activity_repo.fetch_activity(event.id, 10).await.expect("activity");
        assert_eq!(log[0].kind, "event_deleted");
        assert_eq!(log[0].detail, "Summer Gala");
        assert!(matches!(
            delete_event(&state, event.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
