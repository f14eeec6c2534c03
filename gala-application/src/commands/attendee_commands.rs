use tracing::{info, warn};

use crate::activity;
use crate::queries::event_queries;
use crate::{AppError, AppState};
use gala_domain::{
    attendee_name_key,
    current_millis,
    hash_group_password,
    normalize_optional_text,
    verify_group_password,
    ActivityKind,
    ActivityRecord,
    Attendee,
    AttendeeGroup,
    AttendeeGroupView,
    AttendeeId,
    EventId,
    GroupId,
    JoinRequest,
    NewGroup,
};

pub async fn create_group(
    state: &AppState,
    event_id: EventId,
    payload: NewGroup,
) -> Result<AttendeeGroupView, AppError> {
    event_queries::get_event(state, event_id).await?;
    let name = normalize_optional_text(Some(payload.name))
        .ok_or_else(|| AppError::BadRequest("group name must not be empty".to_string()))?;
    let existing = state.attendee_repo.list_groups(event_id).await?;
    if existing
        .iter()
        .any(|group| group.name.eq_ignore_ascii_case(&name))
    {
        return Err(AppError::Conflict(format!("group '{}' already exists", name)));
    }
    let group = AttendeeGroup {
        id: GroupId::new(),
        event_id,
        name,
        group_type: payload.group_type,
        password_hash: normalize_optional_text(payload.password)
            .map(|password| hash_group_password(event_id, &password)),
    };
    state.attendee_repo.insert_group(&group).await?;
    info!(event_id = %event_id, group = %group.name, "attendee group created");
    Ok(AttendeeGroupView::from(&group))
}

/// Joins through an invite code. A returning guest (same name) gets their
/// existing record back; a banned guest is refused.
pub async fn join_event(state: &AppState, payload: JoinRequest) -> Result<Attendee, AppError> {
    let event = event_queries::find_by_invite_code(state, &payload.invite_code).await?;
    let name = normalize_optional_text(Some(payload.name))
        .ok_or_else(|| AppError::BadRequest("name must not be empty".to_string()))?;

    if let Some(group_id) = payload.group_id {
        let group = state
            .attendee_repo
            .fetch_group(group_id)
            .await?
            .filter(|group| group.event_id == event.id)
            .ok_or_else(|| AppError::NotFound(format!("group {}", group_id)))?;
        if let Some(expected) = &group.password_hash {
            let password = payload.password.as_deref().unwrap_or("");
            if !verify_group_password(event.id, password, expected) {
                warn!(event_id = %event.id, group_id = %group_id, "group password rejected");
                return Err(AppError::Unauthorized);
            }
        }
    }

    let key = attendee_name_key(&name);
    let attendees = state.attendee_repo.list_attendees(event.id).await?;
    if let Some(mut returning) = attendees
        .into_iter()
        .find(|attendee| attendee_name_key(&attendee.name) == key)
    {
        if returning.banned {
            return Err(AppError::Conflict(format!("'{}' is banned from this event", returning.name)));
        }
        if payload.group_id.is_some() && payload.group_id != returning.group_id {
            returning.group_id = payload.group_id;
            state.attendee_repo.update_attendee(&returning).await?;
        }
        return Ok(returning);
    }

    let attendee = Attendee {
        id: AttendeeId::new(),
        event_id: event.id,
        group_id: payload.group_id,
        name,
        banned: false,
        joined_at: current_millis(),
    };
    state.attendee_repo.insert_attendee(&attendee).await?;
    state.metrics.record_attendee_joined();
    activity::record_one(
        state,
        ActivityRecord::new(event.id, ActivityKind::AttendeeJoined, attendee.id, attendee.name.clone()),
    )
    .await;
    Ok(attendee)
}

pub async fn ban_attendee(state: &AppState, attendee_id: AttendeeId) -> Result<Attendee, AppError> {
    set_banned(state, attendee_id, true).await
}

pub async fn unban_attendee(state: &AppState, attendee_id: AttendeeId) -> Result<Attendee, AppError> {
    set_banned(state, attendee_id, false).await
}

async fn set_banned(state: &AppState, attendee_id: AttendeeId, banned: bool) -> Result<Attendee, AppError> {
    let mut attendee = state
        .attendee_repo
        .fetch_attendee(attendee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("attendee {}", attendee_id)))?;
    if attendee.banned == banned {
        return Ok(attendee);
    }
    attendee.banned = banned;
    state.attendee_repo.update_attendee(&attendee).await?;
    let kind = if banned {
        ActivityKind::AttendeeBanned
    } else {
        ActivityKind::AttendeeUnbanned
    };
    activity::record_one(
        state,
        ActivityRecord::new(attendee.event_id, kind, attendee.id, attendee.name.clone()),
    )
    .await;
    Ok(attendee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::attendee_queries;
    use crate::test_support::{build_state, seed_event};
    use gala_domain::{Event, GroupType};

    fn join(event: &Event, name: &str) -> JoinRequest {
        JoinRequest {
            invite_code: event.invite_code.clone(),
            name: name.to_string(),
            group_id: None,
            password: None,
        }
    }

    #[tokio::test]
    async fn returning_guest_gets_same_record() {
        let state = build_state();
        let event = seed_event(&state).await;
        let first = join_event(&state, join(&event, "Ada  Lovelace")).await.expect("join");
        let again = join_event(&state, join(&event, "ada lovelace")).await.expect("join");
        assert_eq!(first.id, again.id);
        assert_eq!(attendee_queries::list_attendees(&state, event.id).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn banned_guest_cannot_rejoin_until_unbanned() {
        let state = build_state();
        let event = seed_event(&state).await;
        let guest = join_event(&state, join(&event, "Mallory")).await.expect("join");
        let banned = ban_attendee(&state, guest.id).await.expect("ban");
        assert!(banned.banned);
        assert!(matches!(
            join_event(&state, join(&event, "mallory")).await,
            Err(AppError::Conflict(_))
        ));
        unban_attendee(&state, guest.id).await.expect("unban");
        assert_eq!(join_event(&state, join(&event, "Mallory")).await.expect("join").id, guest.id);
    }

    #[tokio::test]
    async fn password_gate_checks_password() {
        let state = build_state();
        let event = seed_event(&state).await;
        let group = create_group(
            &state,
            event.id,
            NewGroup {
                name: "VIP".to_string(),
                group_type: GroupType::Vip,
                password: Some("velvet".to_string()),
            },
        )
        .await
        .expect("group");
        assert!(group.password_protected);

        let mut request = join(&event, "Grace");
        request.group_id = Some(group.id);
        assert!(matches!(
            join_event(&state, request.clone()).await,
            Err(AppError::Unauthorized)
        ));
        request.password = Some("velvet".to_string());
        let attendee = join_event(&state, request).await.expect("join");
        assert_eq!(attendee.group_id, Some(group.id));
    }

    #[tokio::test]
    async fn duplicate_group_names_conflict() {
        let state = build_state();
        let event = seed_event(&state).await;
        let payload = NewGroup {
            name: "Family".to_string(),
            group_type: GroupType::Regular,
            password: Some("   ".to_string()),
        };
        let group = create_group(&state, event.id, payload.clone()).await.expect("group");
        assert!(!group.password_protected);
        assert!(matches!(
            create_group(&state, event.id, NewGroup { name: "family".to_string(), ..payload }).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn unknown_invite_code_is_not_found() {
        let state = build_state();
        let mut request = JoinRequest {
            invite_code: "ZZZZZZZZ".to_string(),
            name: "Eve".to_string(),
            group_id: None,
            password: None,
        };
        assert!(matches!(join_event(&state, request.clone()).await, Err(AppError::NotFound(_))));
        request.invite_code = String::new();
        assert!(matches!(join_event(&state, request).await, Err(AppError::BadRequest(_))));
    }
}
