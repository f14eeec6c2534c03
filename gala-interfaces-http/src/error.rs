use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use gala_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    Unauthorized,
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    PaymentRequired(String),
    BadGateway(String),
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Unauthorized => HttpError::Unauthorized,
            AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            AppError::NotFound(msg) => HttpError::NotFound(msg),
            AppError::Conflict(msg) => HttpError::Conflict(msg),
            AppError::PaymentRequired(msg) => HttpError::PaymentRequired(msg),
            AppError::Upstream(msg) => HttpError::BadGateway(msg),
            AppError::Internal(err) => {
                error!("internal error: {:#}", err);
                HttpError::Internal(err.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, format!("bad request: {}", msg)),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("not found: {}", msg)),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            HttpError::PaymentRequired(msg) => (StatusCode::PAYMENT_REQUIRED, msg),
            HttpError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
