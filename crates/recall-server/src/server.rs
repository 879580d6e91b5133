//! Server state and routing
//!
//! `AppState` owns the one piece of process-wide mutable state: the active
//! scheduler configuration. Readers take a whole-value `Arc` snapshot and
//! replacement swaps the `Arc` after validation, so a review in flight sees
//! either the old or the new configuration in its entirety, never a mixture.

use std::sync::{Arc, PoisonError, RwLock};

use axum::routing::{get, post};
use axum::Router;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use recall_core::{ConfigError, Scheduler, SchedulerConfig};

use crate::handlers;

/// Requests processed at once across all connections
const MAX_IN_FLIGHT: usize = 256;

// ============================================================================
// APP STATE
// ============================================================================

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    config: Arc<RwLock<Arc<SchedulerConfig>>>,
}

impl AppState {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Whole-value snapshot of the active configuration.
    pub fn config_snapshot(&self) -> Arc<SchedulerConfig> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Engine built from the current configuration snapshot.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::with_config((*self.config_snapshot()).clone())
    }

    /// Validate and atomically swap the active configuration.
    ///
    /// A rejected replacement leaves the previous configuration in effect.
    pub fn replace_config(&self, config: SchedulerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let mut active = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *active = Arc::new(config);
        Ok(())
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Build the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::execute))
        .route("/api/v1/schedule", post(handlers::schedule::execute))
        .route("/api/v1/schedule/batch", post(handlers::batch::execute))
        .route("/api/v1/retention", post(handlers::retention::execute))
        .route("/api/v1/optimal-time", post(handlers::optimal_time::execute))
        .route(
            "/api/v1/config",
            get(handlers::config::read).put(handlers::config::replace),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(GlobalConcurrencyLimitLayer::new(MAX_IN_FLIGHT))
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_config_swaps_the_whole_value() {
        let state = AppState::new(SchedulerConfig::default());
        let mut replacement = SchedulerConfig::default();
        replacement.interval_modifier = 0.8;
        replacement.max_interval = 365.0;

        state.replace_config(replacement.clone()).unwrap();
        let snapshot = state.config_snapshot();
        assert_eq!(*snapshot, replacement);
        assert_eq!(state.scheduler().config().max_interval, 365.0);
    }

    #[test]
    fn test_invalid_replacement_keeps_old_config() {
        let state = AppState::new(SchedulerConfig::default());
        let mut bad = SchedulerConfig::default();
        bad.learning_steps.clear();

        assert!(state.replace_config(bad).is_err());
        assert_eq!(*state.config_snapshot(), SchedulerConfig::default());
    }

    #[test]
    fn test_snapshot_taken_before_swap_stays_coherent() {
        let state = AppState::new(SchedulerConfig::default());
        let before = state.config_snapshot();

        let mut replacement = SchedulerConfig::default();
        replacement.interval_modifier = 0.5;
        state.replace_config(replacement).unwrap();

        // The earlier snapshot still holds the old configuration in full
        assert_eq!(*before, SchedulerConfig::default());
        assert_eq!(state.config_snapshot().interval_modifier, 0.5);
    }
}
