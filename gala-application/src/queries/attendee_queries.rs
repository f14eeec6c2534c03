use crate::queries::event_queries;
use crate::{AppError, AppState};
use gala_domain::{Attendee, AttendeeGroupView, EventId};

pub async fn list_groups(state: &AppState, event_id: EventId) -> Result<Vec<AttendeeGroupView>, AppError> {
    event_queries::get_event(state, event_id).await?;
    let groups = state.attendee_repo.list_groups(event_id).await?;
    Ok(groups.iter().map(AttendeeGroupView::from).collect())
}

pub async fn list_attendees(state: &AppState, event_id: EventId) -> Result<Vec<Attendee>, AppError> {
    event_queries::get_event(state, event_id).await?;
    let mut attendees = state.attendee_repo.list_attendees(event_id).await?;
    attendees.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.name.cmp(&b.name)));
    Ok(attendees)
}
