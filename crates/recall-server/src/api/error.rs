//! API error taxonomy
//!
//! Input-shape and domain-boundary problems are client errors and never
//! reach the engine; a rejected configuration replacement leaves the
//! previous configuration in effect. Nothing in this service retries
//! internally - the engine is deterministic, so a retry with the same input
//! would only repeat the same answer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use recall_core::{ConfigError, ScheduleError};

/// Errors surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/empty identity fields, out-of-domain grades, bad hour sets
    #[error("{0}")]
    InvalidInput(String),

    /// Rejected configuration replacement; the old configuration stays live
    #[error("{0}")]
    InvalidConfig(#[from] ConfigError),
}

impl From<ScheduleError> for ApiError {
    fn from(error: ScheduleError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::InvalidConfig(_) => "invalid_config",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let response = ApiError::InvalidInput("missing required field: userId".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_config_error_is_bad_request() {
        let response = ApiError::from(ConfigError::EmptyLearningSteps).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_schedule_error_converts_to_invalid_input() {
        let error = ApiError::from(ScheduleError::QualityOutOfRange(9));
        assert!(matches!(error, ApiError::InvalidInput(_)));
        assert!(error.to_string().contains("0-5"));
    }
}
