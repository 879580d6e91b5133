//! Forgetting-Curve Scheduler Module
//!
//! SM-2 style spaced repetition with a forgetting-curve memory model on top:
//! - Ease factor controls interval growth (classic SM-2 update, 1.3 floor)
//! - Memory strength models normalized recall confidence with exponential
//!   decay between reviews
//! - Stability slows decay for consolidated items; difficulty penalizes
//!   error-prone ones
//!
//! The engine is a pure function of `(card, quality, response time, now)`:
//! identical inputs always produce identical outcomes, every call is safe to
//! run concurrently with any other, and out-of-range quality grades are
//! clamped rather than rejected so a shared batch run can never be crashed
//! by one bad grade.

pub mod algorithm;

mod config;
mod engine;

pub use algorithm::{
    decayed_memory_strength,
    initial_memory_strength,
    lapse_penalty,
    next_ease_factor,
    retention_probability,
    review_interval,
    streak_bonus,
    // Constants
    DEFAULT_EASE_FACTOR,
    DEFAULT_PREFERRED_HOURS,
    DEFAULT_STABILITY_FACTOR,
    MAX_MEMORY_STRENGTH,
    MIN_MEMORY_STRENGTH,
};

pub use config::{ConfigError, SchedulerConfig};
pub use engine::{ReviewOutcome, Scheduler};
