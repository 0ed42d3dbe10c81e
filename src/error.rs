//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

/// Errors that stop a request before it reaches the explanation logic
#[derive(Debug)]
pub enum AppError {
    // Body errors
    MalformedBody(String),
    UnsupportedMediaType(String),

    // Validation errors
    ValidationError(String),

    // Generic errors
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MalformedBody(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg.as_str()),
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
        };

        tracing::debug!("Rejected request ({}): {}", status, error_message);

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => AppError::ValidationError(e.body_text()),
            JsonRejection::JsonSyntaxError(e) => AppError::MalformedBody(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => AppError::UnsupportedMediaType(e.body_text()),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}
