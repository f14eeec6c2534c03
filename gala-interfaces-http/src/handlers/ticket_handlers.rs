use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use gala_application::commands::ticket_commands;
use gala_application::queries::ticket_queries::{self, TicketSales};
use gala_application::AppState;
use gala_domain::{EventId, SellTicketRequest, Ticket, TicketValidation, ValidateTicketRequest};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_tickets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<Vec<Ticket>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(ticket_queries::list_tickets(&state, event_id).await?))
}

pub async fn sell_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Json(payload): Json<SellTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let ticket = ticket_commands::sell_ticket(&state, event_id, payload).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn validate_ticket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Json(payload): Json<ValidateTicketRequest>,
) -> Result<Json<TicketValidation>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(ticket_commands::validate_ticket(&state, event_id, payload).await?))
}

pub async fn ticket_sales(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<TicketSales>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(ticket_queries::ticket_sales(&state, event_id).await?))
}
