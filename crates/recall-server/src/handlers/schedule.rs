//! Schedule Review
//!
//! Run one review event through the engine and return the updated card.
//! When no snapshot is supplied the card is materialized with defaults
//! before scheduling (first encounter).

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use recall_core::{schedule_one, ReviewSubmission};

use crate::api::types::{ScheduleRequest, ScheduleResponse};
use crate::api::ApiError;
use crate::server::AppState;

pub async fn execute(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let scheduler = state.scheduler();
    let submission = ReviewSubmission {
        user_id: Some(request.user_id),
        item_id: Some(request.item_id),
        quality: Some(request.quality),
        response_time: request.response_time,
        item_type: request.item_type,
        card: request.card,
    };

    let scheduled = schedule_one(&scheduler, submission, Utc::now())?;
    Ok(Json(scheduled.into()))
}

// ============================================================================
// TESTS
// ============================================================================
