use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use gala_application::commands::budget_commands;
use gala_application::queries::budget_queries;
use gala_application::AppState;
use gala_domain::{BudgetLine, BudgetSummary, EventId, NewBudgetLine};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_budget(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<Vec<BudgetLine>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(budget_queries::list_budget(&state, event_id).await?))
}

pub async fn add_budget_line(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
    Json(payload): Json<NewBudgetLine>,
) -> Result<(StatusCode, Json<BudgetLine>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let line = budget_commands::add_budget_line(&state, event_id, payload).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

pub async fn budget_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<EventId>,
) -> Result<Json<BudgetSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(budget_queries::budget_summary(&state, event_id).await?))
}
