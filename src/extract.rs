use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections come back as `AppError` JSON (400) instead
/// of axum's plain-text 415/422 bodies.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}
