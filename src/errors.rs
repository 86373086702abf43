use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::Step;
use crate::services::booking_flow::Rejected;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("Error: {0}")]
    Upstream(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("{event} is not accepted while the booking step is {step}")]
    EventRejected { event: &'static str, step: Step },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EventRejected { .. } => StatusCode::CONFLICT,
        };

        let body = serde_json::json!({ "message": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<Rejected> for AppError {
    fn from(r: Rejected) -> Self {
        AppError::EventRejected {
            event: r.event,
            step: r.step,
        }
    }
}
