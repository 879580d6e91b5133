//! Retention Estimate
//!
//! Read-only forgetting-curve queries over a card snapshot: recall
//! probability at a target instant, decayed memory strength, elapsed days,
//! and the priority score external due-queues sort by.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::api::types::{RetentionRequest, RetentionResponse};
use crate::server::AppState;

pub async fn execute(
    State(state): State<AppState>,
    Json(request): Json<RetentionRequest>,
) -> Json<RetentionResponse> {
    let scheduler = state.scheduler();
    let at = request.target_instant.unwrap_or_else(Utc::now);
    let card = request.card;

    Json(RetentionResponse {
        retention_probability: scheduler.retention_probability(&card, at),
        current_memory_strength: card.current_memory_strength(at),
        days_since_last_review: card.days_since_last_review(at),
        priority_score: card.priority_score(at),
    })
}

// ============================================================================
// TESTS
// ============================================================================
