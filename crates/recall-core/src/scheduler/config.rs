//! Scheduler configuration
//!
//! Every tunable constant of the state machine lives in one value so the
//! facade can expose read/replace as a whole. Replacement is atomic from the
//! engine's perspective: the engine takes the configuration by value, and
//! the facade swaps an `Arc<SchedulerConfig>` - a review in flight sees the
//! old or the new configuration in its entirety, never a mixture.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::algorithm::DEFAULT_EASE_FACTOR;

// ============================================================================
// ERRORS
// ============================================================================

/// Rejection reasons for a malformed configuration replacement.
///
/// A rejected replacement leaves the previous configuration in effect.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("learningSteps must contain at least one step")]
    EmptyLearningSteps,

    #[error("learningSteps[{index}] must be a positive number of days, got {value}")]
    NonPositiveLearningStep { index: usize, value: f64 },

    #[error("interval bounds must satisfy 0 < minInterval <= maxInterval")]
    InvalidIntervalBounds,

    #[error("ease bounds must satisfy 0 < minEaseFactor <= defaultEaseFactor <= maxEaseFactor")]
    InvalidEaseBounds,

    #[error("intervalModifier must be positive, got {0}")]
    NonPositiveIntervalModifier(f64),

    #[error("{field} must be a grade on the 0-5 scale, got {value}")]
    GradeOutOfRange { field: &'static str, value: i32 },

    #[error("passingGrade must not exceed easyGrade")]
    GradeOrder,

    #[error("relearningIntervalCap must be positive, got {0}")]
    NonPositiveRelearningCap(f64),

    #[error("lapseIntervalFactor must be within (0, 1], got {0}")]
    InvalidLapseFactor(f64),

    #[error("stability bounds must satisfy 0 <= minStabilityFactor <= maxStabilityFactor")]
    InvalidStabilityBounds,
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Tunable constants of the forgetting-curve engine.
///
/// Grades are on the 0-5 scale; intervals and steps are days (learning steps
/// are minutes-scale day fractions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Sub-day steps a card climbs before graduating, in days
    pub learning_steps: Vec<f64>,
    /// First interval assigned when a card exits the learning phase
    pub graduating_interval: f64,
    /// Floor for graduated review intervals
    pub min_interval: f64,
    /// Ceiling for every interval the engine emits
    pub max_interval: f64,
    /// Ease factor floor
    pub min_ease_factor: f64,
    /// Ease factor ceiling
    pub max_ease_factor: f64,
    /// Ease assigned to fresh cards and restored at graduation
    pub default_ease_factor: f64,
    /// Global multiplier on graduated interval growth
    pub interval_modifier: f64,
    /// Lowest grade that counts as a pass
    pub passing_grade: i32,
    /// Lowest grade that earns a stability bump
    pub easy_grade: i32,
    /// Ceiling on the relearning entry step, in days
    pub relearning_interval_cap: f64,
    /// Fraction of the pre-lapse interval kept when recovering into REVIEW
    pub lapse_interval_factor: f64,
    /// Stability floor after lapse decrements
    pub min_stability_factor: f64,
    /// Stability ceiling after easy-grade increments
    pub max_stability_factor: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            // 10 minutes, then 30 minutes
            learning_steps: vec![10.0 / 1440.0, 30.0 / 1440.0],
            graduating_interval: 1.0,
            min_interval: 1.0,
            max_interval: 36_500.0,
            min_ease_factor: 1.3,
            max_ease_factor: 3.5,
            default_ease_factor: DEFAULT_EASE_FACTOR,
            interval_modifier: 1.0,
            passing_grade: 3,
            easy_grade: 4,
            relearning_interval_cap: 0.5,
            lapse_interval_factor: 0.25,
            min_stability_factor: 0.5,
            max_stability_factor: 2.0,
        }
    }
}

impl SchedulerConfig {
    /// First learning step in days.
    ///
    /// Falls back to the default 10-minute step if the list is empty, so the
    /// engine stays total even on a configuration that skipped validation.
    pub fn first_learning_step(&self) -> f64 {
        self.learning_steps.first().copied().unwrap_or(10.0 / 1440.0)
    }

    /// Validate a configuration before it replaces the active one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.learning_steps.is_empty() {
            return Err(ConfigError::EmptyLearningSteps);
        }
        for (index, &value) in self.learning_steps.iter().enumerate() {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveLearningStep { index, value });
            }
        }
        if !(self.min_interval > 0.0 && self.min_interval <= self.max_interval) {
            return Err(ConfigError::InvalidIntervalBounds);
        }
        if !(self.min_ease_factor > 0.0
            && self.min_ease_factor <= self.default_ease_factor
            && self.default_ease_factor <= self.max_ease_factor)
        {
            return Err(ConfigError::InvalidEaseBounds);
        }
        if !(self.interval_modifier > 0.0) {
            return Err(ConfigError::NonPositiveIntervalModifier(
                self.interval_modifier,
            ));
        }
        if !(0..=5).contains(&self.passing_grade) {
            return Err(ConfigError::GradeOutOfRange {
                field: "passingGrade",
                value: self.passing_grade,
            });
        }
        if !(0..=5).contains(&self.easy_grade) {
            return Err(ConfigError::GradeOutOfRange {
                field: "easyGrade",
                value: self.easy_grade,
            });
        }
        if self.passing_grade > self.easy_grade {
            return Err(ConfigError::GradeOrder);
        }
        if !(self.relearning_interval_cap > 0.0) {
            return Err(ConfigError::NonPositiveRelearningCap(
                self.relearning_interval_cap,
            ));
        }
        if !(self.lapse_interval_factor > 0.0 && self.lapse_interval_factor <= 1.0) {
            return Err(ConfigError::InvalidLapseFactor(self.lapse_interval_factor));
        }
        if !(self.min_stability_factor >= 0.0
            && self.min_stability_factor <= self.max_stability_factor)
        {
            return Err(ConfigError::InvalidStabilityBounds);
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
