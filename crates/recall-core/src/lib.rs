//! # Recall Core
//!
//! Forgetting-curve scheduling engine for spaced repetition:
//!
//! - **Learning-state machine**: NEW -> LEARNING -> REVIEW with a
//!   RELEARNING recovery path, every transition an explicit match arm
//! - **SM-2 ease updates**: classic `0.1 - (5-q)(0.08 + (5-q)0.02)` delta
//!   with a 1.3 floor, scaled by a global interval modifier
//! - **Memory model**: normalized recall confidence with exponential decay,
//!   stability slowing decay for consolidated items, difficulty penalizing
//!   error-prone ones
//! - **Batch coordination**: per-item isolation so one malformed submission
//!   never aborts its siblings
//!
//! The engine performs no I/O and holds no state beyond a configuration
//! value: every call is a pure function of `(card, quality, response time,
//! now)`. Persistence, authentication, and due-queue selection belong to
//! the caller; the core receives a card snapshot as a value and returns an
//! updated value.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use recall_core::{ReviewCard, Scheduler};
//!
//! let scheduler = Scheduler::new();
//! let now = Utc::now();
//!
//! // First encounter: a fresh card, answered correctly
//! let mut card = ReviewCard::new("learner-7", "kanji-482", now);
//! let outcome = scheduler.next_review(&card, 4, Some(3.2), now);
//! card.apply_review(&outcome, Some(3.2), now);
//!
//! assert!(card.next_review > now);
//! let retention = scheduler.retention_probability(&card, now);
//! assert!(retention <= 0.95);
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod batch;
pub mod card;
pub mod scheduler;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Card value object
pub use card::{LearningState, ReviewCard};

// Scheduling engine
pub use scheduler::{
    decayed_memory_strength,
    initial_memory_strength,
    // Core functions for advanced usage
    retention_probability,
    ConfigError,
    ReviewOutcome,
    Scheduler,
    SchedulerConfig,
    // Constants
    DEFAULT_EASE_FACTOR,
    DEFAULT_PREFERRED_HOURS,
    MAX_MEMORY_STRENGTH,
    MIN_MEMORY_STRENGTH,
};

// Batch coordination
pub use batch::{
    schedule_one, BatchCoordinator, BatchEntry, BatchItemResult, BatchReport, BatchSummary,
    ReviewSubmission, ScheduleError, ScheduledReview,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        BatchCoordinator, BatchSummary, LearningState, ReviewCard, ReviewOutcome,
        ReviewSubmission, ScheduleError, Scheduler, SchedulerConfig, ScheduledReview,
    };
}
