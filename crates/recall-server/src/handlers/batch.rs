//! Batch Schedule
//!
//! Schedule many review events in one request. Entries arrive as raw JSON
//! values so a malformed entry fails on its own; the summary always
//! accounts for every submitted entry.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use recall_core::{BatchCoordinator, BatchEntry, ReviewSubmission, ScheduleError};

use crate::api::types::{BatchScheduleRequest, BatchScheduleResponse};
use crate::server::AppState;

pub async fn execute(
    State(state): State<AppState>,
    Json(request): Json<BatchScheduleRequest>,
) -> Json<BatchScheduleResponse> {
    let scheduler = state.scheduler();
    let coordinator = BatchCoordinator::new(&scheduler);

    let entries: Vec<BatchEntry> = request
        .reviews
        .into_iter()
        .map(|value| {
            serde_json::from_value::<ReviewSubmission>(value)
                .map_err(|error| ScheduleError::Malformed(error.to_string()))
        })
        .collect();

    let report = coordinator.run(entries, Utc::now());
    Json(BatchScheduleResponse::from(report))
}

// ============================================================================
// TESTS
// ============================================================================
