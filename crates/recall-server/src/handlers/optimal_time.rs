//! Optimal Review Time
//!
//! Snap a card's scheduled review onto the learner's preferred hours of
//! day. The facade rejects hours outside 0-23; with no hours supplied the
//! default morning/evening windows apply.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::api::types::{OptimalTimeRequest, OptimalTimeResponse};
use crate::api::ApiError;
use crate::server::AppState;

pub async fn execute(
    State(state): State<AppState>,
    Json(request): Json<OptimalTimeRequest>,
) -> Result<Json<OptimalTimeResponse>, ApiError> {
    let hours = request.preferred_hours.unwrap_or_default();
    if let Some(bad) = hours.iter().find(|h| **h >= 24) {
        return Err(ApiError::InvalidInput(format!(
            "preferredHours entries must be within 0-23, got {bad}"
        )));
    }

    let scheduler = state.scheduler();
    let scheduled = request.card.next_review;
    let optimal = scheduler.optimal_review_time(&request.card, &hours, Utc::now());

    Ok(Json(OptimalTimeResponse {
        scheduled_review_epoch_ms: scheduled.timestamp_millis(),
        optimal_review_epoch_ms: optimal.timestamp_millis(),
        adjustment_ms: optimal.timestamp_millis() - scheduled.timestamp_millis(),
    }))
}

// ============================================================================
// TESTS
// ============================================================================
