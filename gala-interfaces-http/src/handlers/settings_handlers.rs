use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{debug, warn};

use gala_application::commands::settings_commands;
use gala_application::queries::settings_queries::{self, EventCountdown};
use gala_application::AppState;
use gala_domain::{
    EventId,
    SeatmapConfig,
    SeatmapConfigPatch,
    TicketConfig,
    TicketConfigPatch,
    TimerSettings,
    TimerSettingsPatch,
};

use crate::error::HttpError;
use crate::middleware::{authorize, authorize_with_query};

#[derive(Deserialize)]
pub struct StreamQuery {
    pub access_token: Option<String>,
}

pub async fn get_timer_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<TimerSettings>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(settings_queries::get_timer_settings(&state, event_id).await?))
}

pub async fn update_timer_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Json(patch): Json<TimerSettingsPatch>,
) -> Result<Json<TimerSettings>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(settings_commands::update_timer_settings(&state, event_id, patch).await?))
}

pub async fn get_countdown(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<EventCountdown>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(settings_queries::get_countdown(&state, event_id).await?))
}

pub async fn get_ticket_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<TicketConfig>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(settings_queries::get_ticket_config(&state, event_id).await?))
}

pub async fn update_ticket_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Json(patch): Json<TicketConfigPatch>,
) -> Result<Json<TicketConfig>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(settings_commands::update_ticket_config(&state, event_id, patch).await?))
}

pub async fn get_seatmap_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<SeatmapConfig>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(settings_queries::get_seatmap_config(&state, event_id).await?))
}

pub async fn update_seatmap_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Json(patch): Json<SeatmapConfigPatch>,
) -> Result<Json<SeatmapConfig>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(settings_commands::update_seatmap_config(&state, event_id, patch).await?))
}

/// Sends the current timer settings, then every update until either side closes.
pub async fn timer_stream(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Query(query): Query<StreamQuery>,
) -> Result<Response, HttpError> {
    if !authorize_with_query(&state.config, &headers, query.access_token.as_deref()) {
        return Err(HttpError::Unauthorized);
    }
    let current = settings_queries::get_timer_settings(&state, event_id).await?;
    let updates = state.timer_hub.subscribe(event_id).await;
    Ok(ws.on_upgrade(move |socket| stream_timer(socket, event_id, current, updates)))
}

async fn stream_timer(
    mut socket: WebSocket,
    event_id: EventId,
    current: TimerSettings,
    mut updates: Receiver<TimerSettings>,
) {
    if send_settings(&mut socket, &current).await.is_err() {
        return;
    }
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(settings) => {
                    if send_settings(&mut socket, &settings).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(event_id = %event_id, skipped, "timer stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    debug!(event_id = %event_id, "timer stream closed");
}

async fn send_settings(socket: &mut WebSocket, settings: &TimerSettings) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(settings).map_err(axum::Error::new)?;
    socket.send(Message::Text(payload)).await
}
