//! Forgetting-curve engine
//!
//! The state-machine transition function plus the post-processing pipeline
//! for graduated reviews. The engine holds nothing but its configuration
//! value: every call is a pure function of `(card, quality, response time,
//! now)` and may run concurrently with any other call, including calls for
//! the same card. Serializing concurrent updates to one stored card is the
//! caller's job.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::Serialize;
use tracing::debug;

use crate::card::{LearningState, ReviewCard};
use crate::scheduler::algorithm::{
    self, clamp_quality, initial_memory_strength, lapse_penalty, next_ease_factor,
    review_interval, streak_bonus, DEFAULT_PREFERRED_HOURS, FAST_RESPONSE_RATIO,
    LEARNING_MEMORY_CAP, MAX_MEMORY_STRENGTH, MIN_MEMORY_STRENGTH, MS_PER_DAY,
    RELEARNING_MEMORY_CAP, SLOW_RESPONSE_RATIO,
};
use crate::scheduler::SchedulerConfig;

fn duration_from_days(days: f64) -> Duration {
    Duration::milliseconds((days * MS_PER_DAY).round() as i64)
}

// ============================================================================
// REVIEW OUTCOME
// ============================================================================

/// Everything one engine call decides about a card.
///
/// The outcome is applied to the stored card through
/// [`ReviewCard::apply_review`] in a single update; the engine never writes
/// to the card itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub learning_state: LearningState,
    pub ease_factor: f64,
    /// Days until the next presentation (may be a sub-day learning step)
    pub interval: f64,
    pub repetition: u32,
    pub memory_strength: f64,
    pub stability_factor: f64,
    pub difficulty_factor: f64,
    /// True once the card has ever exited the learning phase
    pub graduated: bool,
    /// Whether the grade cleared the passing threshold
    pub passed: bool,
    pub next_review: DateTime<Utc>,
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// The forgetting-curve scheduling engine.
///
/// Stateless apart from its configuration value; cheap to construct per
/// request from a configuration snapshot.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with an explicit configuration value.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Decide the state transition and next scheduling parameters for one
    /// review event.
    ///
    /// `quality` is clamped onto the 0-5 grade scale - the engine is total
    /// and never panics, so one malformed grade cannot abort a shared batch
    /// run. Rejecting out-of-range grades is the facade's job.
    pub fn next_review(
        &self,
        card: &ReviewCard,
        quality: i32,
        response_time: Option<f64>,
        now: DateTime<Utc>,
    ) -> ReviewOutcome {
        let cfg = &self.config;
        let quality = clamp_quality(quality);
        let passed = quality >= cfg.passing_grade;
        let first_step = cfg.first_learning_step();

        let mut out = ReviewOutcome {
            learning_state: card.learning_state,
            ease_factor: card.ease_factor,
            interval: card.interval,
            repetition: card.repetition,
            memory_strength: card.memory_strength,
            stability_factor: card.stability_factor,
            difficulty_factor: card.difficulty_factor,
            graduated: card.graduated,
            passed,
            next_review: now,
        };

        match (card.learning_state, passed) {
            (LearningState::New, true) => {
                out.learning_state = LearningState::Learning;
                out.repetition = 1;
                out.interval = first_step;
                out.memory_strength = initial_memory_strength(quality);
            }
            (LearningState::New, false) => {
                out.learning_state = LearningState::New;
                out.repetition = 0;
                out.interval = first_step;
                out.memory_strength = MIN_MEMORY_STRENGTH;
            }
            (LearningState::Learning, true) => {
                let consumed = card.repetition as usize;
                if consumed >= cfg.learning_steps.len() {
                    // Steps exhausted: graduate with a fresh ease factor
                    out.learning_state = LearningState::Review;
                    out.interval = cfg.graduating_interval;
                    out.ease_factor = cfg.default_ease_factor;
                    out.repetition = card.repetition + 1;
                    out.graduated = true;
                } else {
                    out.learning_state = LearningState::Learning;
                    out.interval = cfg.learning_steps[consumed];
                    out.repetition = card.repetition + 1;
                    out.memory_strength =
                        (card.memory_strength + 0.2).min(LEARNING_MEMORY_CAP);
                }
            }
            (LearningState::Learning, false) => {
                // Restart at the first step
                out.learning_state = LearningState::Learning;
                out.repetition = 1;
                out.interval = first_step;
                out.memory_strength = (card.memory_strength - 0.3).max(MIN_MEMORY_STRENGTH);
            }
            (LearningState::Review, true) => {
                self.review_pass(card, quality, response_time, &mut out);
            }
            (LearningState::Review, false) => {
                // Lapse: back through the short steps, never past the cap
                out.learning_state = LearningState::Relearning;
                out.ease_factor = (card.ease_factor - 0.2)
                    .clamp(cfg.min_ease_factor, cfg.max_ease_factor);
                out.interval = first_step.min(cfg.relearning_interval_cap);
                out.memory_strength = (card.memory_strength * 0.5).max(MIN_MEMORY_STRENGTH);
                out.stability_factor =
                    (card.stability_factor - 0.1).max(cfg.min_stability_factor);
                out.repetition = 0;
            }
            (LearningState::Relearning, true) => {
                // Conservative restart at a quarter of the previous interval
                out.learning_state = LearningState::Review;
                out.interval = (card.interval * cfg.lapse_interval_factor)
                    .round()
                    .max(cfg.min_interval);
                out.memory_strength =
                    (card.memory_strength + 0.3).min(RELEARNING_MEMORY_CAP);
                out.repetition = 1;
                out.graduated = true;
            }
            (LearningState::Relearning, false) => {
                out.learning_state = LearningState::Relearning;
                out.interval = first_step.min(cfg.relearning_interval_cap);
                out.memory_strength = (card.memory_strength - 0.1).max(MIN_MEMORY_STRENGTH);
            }
        }

        // Invariants must hold even for hostile snapshots the caller feeds in
        out.ease_factor = out
            .ease_factor
            .clamp(cfg.min_ease_factor, cfg.max_ease_factor);
        out.memory_strength = out
            .memory_strength
            .clamp(MIN_MEMORY_STRENGTH, MAX_MEMORY_STRENGTH);
        out.stability_factor = out.stability_factor.max(0.0);
        out.interval = out.interval.min(cfg.max_interval);
        out.next_review = now + duration_from_days(out.interval);

        debug!(
            user_id = %card.user_id,
            item_id = %card.item_id,
            from = %card.learning_state,
            to = %out.learning_state,
            quality,
            interval = out.interval,
            "review scheduled"
        );

        out
    }

    /// Passing review of a graduated card: SM-2 ease update, interval rungs,
    /// then the post-processing pipeline in its fixed order.
    fn review_pass(
        &self,
        card: &ReviewCard,
        quality: i32,
        response_time: Option<f64>,
        out: &mut ReviewOutcome,
    ) {
        let cfg = &self.config;
        let ease = next_ease_factor(
            card.ease_factor,
            quality,
            cfg.min_ease_factor,
            cfg.max_ease_factor,
        );
        let mut interval = review_interval(card.interval, ease, cfg.interval_modifier);
        let mut strength =
            (card.memory_strength + (quality - 2) as f64 * 0.1).min(MAX_MEMORY_STRENGTH);
        let mut stability = card.stability_factor;
        let mut difficulty = card.difficulty_factor;

        if quality >= cfg.easy_grade {
            stability = (stability + 0.1).min(cfg.max_stability_factor);
        }

        // 1. Response time against the card's own history
        if let Some(rt) = response_time {
            if rt > 0.0 && card.average_response_time > 0.0 {
                let ratio = rt / card.average_response_time;
                if ratio < FAST_RESPONSE_RATIO {
                    interval *= 1.1;
                    strength = (strength + 0.05).min(MAX_MEMORY_STRENGTH);
                } else if ratio > SLOW_RESPONSE_RATIO {
                    interval *= 0.9;
                    difficulty += 0.1;
                }
            }
        }

        // 2. Lapse history shrinks the interval, a long streak grows it
        let penalty = lapse_penalty(card.lapses);
        if penalty > 0.0 {
            interval *= 1.0 - penalty;
            difficulty += 0.05;
        }
        let bonus = streak_bonus(card.correct_streak);
        if bonus > 0.0 {
            interval *= 1.0 + bonus;
        }

        // 3. Hard bounds win over every adjustment
        interval = interval.clamp(cfg.min_interval, cfg.max_interval);

        out.learning_state = LearningState::Review;
        out.ease_factor = ease;
        out.interval = interval;
        out.repetition = card.repetition + 1;
        out.memory_strength = strength;
        out.stability_factor = stability;
        out.difficulty_factor = difficulty;
    }

    // ========================================================================
    // READ-ONLY ESTIMATORS
    // ========================================================================

    /// Forgetting-curve recall probability for a card at `at`.
    pub fn retention_probability(&self, card: &ReviewCard, at: DateTime<Utc>) -> f64 {
        algorithm::retention_probability(
            card.memory_strength,
            card.stability_factor,
            card.ease_factor,
            card.fractional_days_since_last_review(at),
        )
    }

    /// Snap a card's scheduled review onto the caller's preferred hours.
    ///
    /// A schedule already inside the preferred set is returned unchanged;
    /// otherwise it snaps to the nearest preferred hour on the same day
    /// (earlier hour wins a tie), rolling to the next day when that instant
    /// has already passed `now`. Hours outside 0-23 are ignored; an empty
    /// set falls back to the default morning/evening windows.
    pub fn optimal_review_time(
        &self,
        card: &ReviewCard,
        preferred_hours: &[u32],
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let valid: Vec<u32> = preferred_hours.iter().copied().filter(|h| *h < 24).collect();
        let hours: &[u32] = if valid.is_empty() {
            &DEFAULT_PREFERRED_HOURS
        } else {
            &valid
        };

        let scheduled = card.next_review;
        let hour = scheduled.hour();
        if hours.contains(&hour) {
            return scheduled;
        }

        let Some(nearest) = hours
            .iter()
            .copied()
            .min_by_key(|h| ((*h as i64 - hour as i64).abs(), *h))
        else {
            return scheduled;
        };
        let Some(candidate) = scheduled.date_naive().and_hms_opt(nearest, 0, 0) else {
            return scheduled;
        };
        let candidate = candidate.and_utc();

        if candidate <= now {
            candidate + Duration::days(1)
        } else {
            candidate
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
