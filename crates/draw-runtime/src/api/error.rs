//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use ld_03_draw_orchestrator::DrawError;
use thiserror::Error;

/// Errors returned by the query routes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Date {0} is in the future")]
    FutureDate(NaiveDate),

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("Metrics unavailable: {0}")]
    Metrics(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidDate(_) | ApiError::FutureDate(_) => StatusCode::BAD_REQUEST,
            ApiError::Draw(DrawError::UserNotFound(_) | DrawError::DrawNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            // Verification could not run; distinct from a mismatch, which is a 200.
            ApiError::Draw(DrawError::Locator(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Draw(e) if e.is_transient() => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Draw(_) | ApiError::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = %status, error = %self, "Request failed");
        }
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}
