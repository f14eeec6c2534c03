use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::Value;

use gala_application::commands::{generation_commands, pricing_commands, wallet_commands};
use gala_application::queries::{pricing_queries, wallet_queries};
use gala_application::AppState;
use gala_domain::{CreditRequest, EventId, FeaturePrice, GenerationResult, Wallet};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_wallet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Result<Json<Wallet>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(wallet_queries::get_wallet(&state, &user_id).await?))
}

pub async fn credit_wallet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Json(payload): Json<CreditRequest>,
) -> Result<Json<Wallet>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(wallet_commands::credit_wallet(&state, &user_id, payload).await?))
}

pub async fn list_prices(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<FeaturePrice>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(pricing_queries::list_prices(&state).await))
}

pub async fn update_price(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<FeaturePrice>,
) -> Result<Json<Vec<FeaturePrice>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(pricing_commands::update_price(&state, payload).await?))
}

pub async fn reload_pricing(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<FeaturePrice>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(pricing_commands::reload_pricing(&state).await?))
}

/// An absent or non-JSON body is forwarded as an empty object.
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((event_id, feature)): Path<(EventId, String)>,
    body: Option<Json<Value>>,
) -> Result<Json<GenerationResult>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let body = body.map(|Json(value)| value).unwrap_or(Value::Null);
    Ok(Json(generation_commands::generate(&state, event_id, &feature, body).await?))
}
