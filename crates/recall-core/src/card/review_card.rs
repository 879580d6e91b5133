//! Review Card - one learner/item scheduling record
//!
//! Each card tracks:
//! - Scheduling parameters (ease, interval, memory strength, stability)
//! - The learning-state machine position
//! - Running performance counters (reviews, streak, lapses, response time)
//!
//! Timestamps serialize through RFC 3339 text and deserialize back without
//! loss; callers may persist snapshots in any textual store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::LearningState;
use crate::scheduler::algorithm::{
    decayed_memory_strength, DEFAULT_EASE_FACTOR, DEFAULT_STABILITY_FACTOR, MIN_MEMORY_STRENGTH,
    MS_PER_DAY,
};
use crate::scheduler::ReviewOutcome;

// Priority score weights (callers sort descending on the result)
const STRENGTH_WEIGHT: f64 = 10.0;
const OVERDUE_WEIGHT: f64 = 2.0;
const OVERDUE_CAP: f64 = 10.0;
const LAPSE_WEIGHT: f64 = 0.5;

// ============================================================================
// REVIEW CARD
// ============================================================================

/// A learner/item pairing with its full scheduling state.
///
/// Identity is the `(user_id, item_id)` pair; the caller owns uniqueness and
/// at-most-one in-flight update per key. The engine never mutates a card
/// directly - it returns a [`ReviewOutcome`] which is applied through
/// [`ReviewCard::apply_review`], keeping the review transaction a single
/// update from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCard {
    /// Learner identity (caller-supplied, opaque)
    pub user_id: String,
    /// Content item identity (caller-supplied, opaque)
    pub item_id: String,
    /// Optional free-form content category tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,

    // ========== Scheduling parameters ==========
    /// Interval growth multiplier, kept within [1.3, 3.5]
    pub ease_factor: f64,
    /// Days until the next review, kept within [1, 36500] once in REVIEW
    pub interval: f64,
    /// Successful reviews since creation or the last lapse
    pub repetition: u32,
    /// Normalized recall confidence, kept within [0.1, 0.95]
    pub memory_strength: f64,
    /// Slows memory decay for well-consolidated items
    pub stability_factor: f64,
    /// Penalizes scheduling for historically error-prone items
    pub difficulty_factor: f64,

    // ========== Lifecycle ==========
    /// Position in the acquisition state machine
    pub learning_state: LearningState,
    /// True once the item has exited the initial learning phase at least once
    pub graduated: bool,
    /// Suspended cards are never due; parameters stay valid and inspectable
    pub suspended: bool,

    // ========== Timestamps ==========
    /// Instant of the most recent review, `None` until first reviewed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// Next scheduled presentation (a fresh card is due immediately)
    pub next_review: DateTime<Utc>,
    /// When the card was created
    pub created_at: DateTime<Utc>,
    /// When the card was last modified
    pub updated_at: DateTime<Utc>,

    // ========== Performance counters ==========
    /// Total review events applied to this card
    pub total_reviews: u32,
    /// Consecutive passing reviews
    pub correct_streak: u32,
    /// Failed recalls after the card had graduated
    pub lapses: u32,
    /// Running average response time in seconds (0 until first sample)
    pub average_response_time: f64,
}

impl ReviewCard {
    /// Create a fresh card for a learner/item pairing, due immediately.
    pub fn new(user_id: impl Into<String>, item_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            item_type: None,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0.0,
            repetition: 0,
            memory_strength: MIN_MEMORY_STRENGTH,
            stability_factor: DEFAULT_STABILITY_FACTOR,
            difficulty_factor: 0.0,
            learning_state: LearningState::New,
            graduated: false,
            suspended: false,
            last_reviewed: None,
            next_review: now,
            created_at: now,
            updated_at: now,
            total_reviews: 0,
            correct_streak: 0,
            lapses: 0,
            average_response_time: 0.0,
        }
    }

    /// Attach a content category tag.
    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    // ========================================================================
    // DERIVED QUERIES
    // ========================================================================

    /// True iff the card is scheduled at or before `now` and not suspended.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.suspended && self.next_review <= now
    }

    /// True iff more than one day has elapsed past the scheduled review.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.suspended && now - self.next_review > chrono::Duration::days(1)
    }

    /// Whole days since the last review (floor), 0 if never reviewed.
    pub fn days_since_last_review(&self, now: DateTime<Utc>) -> i64 {
        match self.last_reviewed {
            Some(last) => ((now - last).num_milliseconds() as f64 / MS_PER_DAY).floor() as i64,
            None => 0,
        }
    }

    /// Whole days until the next review (ceil, negative when overdue),
    /// 0 if never reviewed.
    pub fn days_until_next_review(&self, now: DateTime<Utc>) -> i64 {
        if self.last_reviewed.is_none() {
            return 0;
        }
        ((self.next_review - now).num_milliseconds() as f64 / MS_PER_DAY).ceil() as i64
    }

    /// Fractional days since the last review, 0 if never reviewed.
    pub fn fractional_days_since_last_review(&self, now: DateTime<Utc>) -> f64 {
        match self.last_reviewed {
            Some(last) => ((now - last).num_milliseconds() as f64 / MS_PER_DAY).max(0.0),
            None => 0.0,
        }
    }

    /// Stored memory strength decayed exponentially since the last review.
    ///
    /// Decay rate is `0.1 / stability_factor`; the result never drops below
    /// 0.1. A card that was never reviewed returns its stored strength.
    pub fn current_memory_strength(&self, now: DateTime<Utc>) -> f64 {
        match self.last_reviewed {
            Some(_) => decayed_memory_strength(
                self.memory_strength,
                self.stability_factor,
                self.fractional_days_since_last_review(now),
            ),
            None => self.memory_strength,
        }
    }

    /// Composite urgency scalar for external due-queue ordering.
    ///
    /// Weak recall, overdue days (capped), accumulated difficulty, and lapse
    /// history all push the score up. There is no upper bound; callers sort
    /// descending.
    pub fn priority_score(&self, now: DateTime<Utc>) -> f64 {
        let current = self.current_memory_strength(now);
        let overdue_days =
            ((now - self.next_review).num_milliseconds() as f64 / MS_PER_DAY).max(0.0);
        (1.0 - current) * STRENGTH_WEIGHT
            + (overdue_days * OVERDUE_WEIGHT).min(OVERDUE_CAP)
            + self.difficulty_factor
            + self.lapses as f64 * LAPSE_WEIGHT
    }

    // ========================================================================
    // REVIEW TRANSACTION
    // ========================================================================

    /// Apply an engine outcome plus the bookkeeping for one review event.
    ///
    /// Writes the scheduling parameters computed by the engine, then updates
    /// the counters: total reviews, running average response time, correct
    /// streak, and lapses (a failed recall counts as a lapse only when the
    /// card had ever graduated). One call, one review transaction.
    pub fn apply_review(
        &mut self,
        outcome: &ReviewOutcome,
        response_time: Option<f64>,
        now: DateTime<Utc>,
    ) {
        let had_graduated = self.graduated;

        self.learning_state = outcome.learning_state;
        self.ease_factor = outcome.ease_factor;
        self.interval = outcome.interval;
        self.repetition = outcome.repetition;
        self.memory_strength = outcome.memory_strength;
        self.stability_factor = outcome.stability_factor;
        self.difficulty_factor = outcome.difficulty_factor;
        self.graduated = had_graduated || outcome.graduated;
        self.next_review = outcome.next_review;

        self.total_reviews += 1;
        if let Some(rt) = response_time {
            if rt > 0.0 {
                self.average_response_time = if self.average_response_time > 0.0 {
                    (self.average_response_time * (self.total_reviews - 1) as f64 + rt)
                        / self.total_reviews as f64
                } else {
                    rt
                };
            }
        }

        if outcome.passed {
            self.correct_streak += 1;
        } else {
            self.correct_streak = 0;
            if had_graduated {
                self.lapses += 1;
            }
        }

        self.last_reviewed = Some(now);
        self.updated_at = now;
    }
}

// ============================================================================
// TESTS
// ============================================================================
