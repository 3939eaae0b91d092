use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::BookingStatus;

/// Message shown to the user whenever the store could not be reached.
pub const RETRY_MESSAGE: &str = "request failed, please retry";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("missing required field: {0}")]
    ValidationMissing(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("date already booked: {0}")]
    DateUnavailable(String),

    #[error("conflict: booking {id} is at version {current}, request expected {expected}")]
    Conflict { id: String, expected: i64, current: i64 },

    #[error("cannot move a booking from {from} to {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AppError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationMissing(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::DateUnavailable(_) => StatusCode::CONFLICT,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = if self.is_retryable() {
            // The backend detail is logged, never shown.
            tracing::error!(error = %self, "store request failed");
            serde_json::json!({ "error": RETRY_MESSAGE, "retryable": true })
        } else {
            serde_json::json!({ "error": self.to_string() })
        };
        (status, axum::Json(body)).into_response()
    }
}
