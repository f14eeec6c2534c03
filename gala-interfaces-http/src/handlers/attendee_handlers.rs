use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use gala_application::commands::attendee_commands;
use gala_application::queries::attendee_queries;
use gala_application::AppState;
use gala_domain::{Attendee, AttendeeGroupView, AttendeeId, EventId, JoinRequest, NewGroup};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_groups(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<Vec<AttendeeGroupView>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(attendee_queries::list_groups(&state, event_id).await?))
}

pub async fn create_group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Json(payload): Json<NewGroup>,
) -> Result<(StatusCode, Json<AttendeeGroupView>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let group = attendee_commands::create_group(&state, event_id, payload).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn list_attendees(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<Vec<Attendee>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(attendee_queries::list_attendees(&state, event_id).await?))
}

pub async fn join_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<JoinRequest>,
) -> Result<Json<Attendee>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(attendee_commands::join_event(&state, payload).await?))
}

pub async fn ban_attendee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(attendee_id): Path<AttendeeId>,
) -> Result<Json<Attendee>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(attendee_commands::ban_attendee(&state, attendee_id).await?))
}

pub async fn unban_attendee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(attendee_id): Path<AttendeeId>,
) -> Result<Json<Attendee>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(attendee_commands::unban_attendee(&state, attendee_id).await?))
}
