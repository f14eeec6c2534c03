use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use gala_application::commands::event_commands;
use gala_application::queries::{activity_queries, event_queries};
use gala_application::AppState;
use gala_domain::{ActivityQuery, ActivityRecord, Event, EventId, EventPatch, NewEvent};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(Deserialize)]
pub struct OwnerQuery {
    pub owner: String,
}

pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Event>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let events = event_queries::list_events(&state, &query.owner).await?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let event = event_commands::create_event(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<Event>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let event = event_queries::get_event(&state, event_id).await?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let event = event_commands::update_event(&state, event_id, patch).await?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    event_commands::delete_event(&state, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn find_by_invite_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Json<Event>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let event = event_queries::find_by_invite_code(&state, &code).await?;
    Ok(Json(event))
}

pub async fn list_activity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityRecord>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let records = activity_queries::list_activity(&state, event_id, query.limit).await?;
    Ok(Json(records))
}
