//! Configuration Read/Replace
//!
//! The scheduler's tunables are read and replaced as one value. A
//! replacement is validated first and swapped atomically; on rejection the
//! previous configuration stays in effect.

use axum::extract::State;
use axum::Json;
use tracing::info;

use recall_core::SchedulerConfig;

use crate::api::ApiError;
use crate::server::AppState;

pub async fn read(State(state): State<AppState>) -> Json<SchedulerConfig> {
    Json((*state.config_snapshot()).clone())
}

pub async fn replace(
    State(state): State<AppState>,
    Json(config): Json<SchedulerConfig>,
) -> Result<Json<SchedulerConfig>, ApiError> {
    state.replace_config(config.clone())?;
    info!(
        steps = config.learning_steps.len(),
        interval_modifier = config.interval_modifier,
        "scheduler configuration replaced"
    );
    Ok(Json(config))
}

// ============================================================================
// TESTS
// ============================================================================
