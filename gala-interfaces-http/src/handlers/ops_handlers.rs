use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tokio::time::{timeout, Duration};
use tracing::error;

use gala_application::AppState;

use crate::middleware::authorize;

#[derive(serde::Serialize)]
struct GatewayStatus {
    status: String,
    configured: bool,
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    match timeout(timeout_duration, state.health.check_storage()).await {
        Ok(Ok(true)) => StatusCode::OK,
        Ok(Ok(false)) => StatusCode::SERVICE_UNAVAILABLE,
        Ok(Err(err)) => {
            error!("storage readiness check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => {
            error!("storage readiness check timeout after {}s", timeout_secs);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn ai_gateway_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let configured = state.config.functions_base_url.is_some();
    let reply = |code: StatusCode, status: &str| {
        (
            code,
            Json(GatewayStatus {
                status: status.to_string(),
                configured,
            }),
        )
            .into_response()
    };
    if !authorize(&state.config, &headers) {
        return reply(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    let timeout_secs = state.config.request_timeout_seconds.max(1);
    match timeout(Duration::from_secs(timeout_secs), state.health.check_ai_gateway()).await {
        Ok(Ok(true)) => reply(StatusCode::OK, "ok"),
        Ok(Ok(false)) => reply(StatusCode::SERVICE_UNAVAILABLE, "error"),
        Ok(Err(err)) => {
            error!("ai gateway check failed: {}", err);
            reply(StatusCode::SERVICE_UNAVAILABLE, "error")
        }
        Err(_) => {
            error!("ai gateway check timeout after {}s", timeout_secs);
            reply(StatusCode::SERVICE_UNAVAILABLE, "timeout")
        }
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}
