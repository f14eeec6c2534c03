use crate::{AppError, AppState};
use gala_domain::{normalize_invite_code, Event, EventId, UserId};

pub async fn get_event(state: &AppState, event_id: EventId) -> Result<Event, AppError> {
    state
        .event_repo
        .fetch_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {}", event_id)))
}

pub async fn list_events(state: &AppState, owner_id: &str) -> Result<Vec<Event>, AppError> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        return Err(AppError::BadRequest("owner_id must not be empty".to_string()));
    }
    let mut events = state
        .event_repo
        .list_events(&UserId(owner_id.to_string()))
        .await?;
    events.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
    Ok(events)
}

pub async fn find_by_invite_code(state: &AppState, code: &str) -> Result<Event, AppError> {
    let code = normalize_invite_code(code);
    if code.is_empty() {
        return Err(AppError::BadRequest("invite code must not be empty".to_string()));
    }
    state
        .event_repo
        .fetch_event_by_invite_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no event for invite code '{}'", code)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_state, seed_event, OWNER};

    #[tokio::test]
    async fn invite_code_lookup_is_case_insensitive() {
        let state = build_state();
        let event = seed_event(&state).await;
        let found = find_by_invite_code(&state, &format!(" {} ", event.invite_code.to_lowercase()))
            .await
            .expect("lookup");
        assert_eq!(found.id, event.id);
        assert!(matches!(
            find_by_invite_code(&state, "NOPE0000").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_events_is_scoped_to_owner() {
        let state = build_state();
        seed_event(&state).await;
        assert_eq!(list_events(&state, OWNER).await.expect("list").len(), 1);
        assert!(list_events(&state, "someone-else").await.expect("list").is_empty());
        assert!(matches!(list_events(&state, " ").await, Err(AppError::BadRequest(_))));
    }
}
