//! Pure scheduling math
//!
//! Free functions shared by the engine and the card's derived queries. All
//! of them are total: out-of-range inputs are clamped, never rejected.

// ============================================================================
// CONSTANTS
// ============================================================================

/// Milliseconds in a day, for fractional-day arithmetic
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Ease factor assigned to fresh cards and restored at graduation
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Stability assigned to fresh cards
pub const DEFAULT_STABILITY_FACTOR: f64 = 1.0;

/// Lower bound of normalized recall confidence
pub const MIN_MEMORY_STRENGTH: f64 = 0.1;

/// Upper bound of normalized recall confidence
pub const MAX_MEMORY_STRENGTH: f64 = 0.95;

/// Memory strength cap while a card is still in the learning steps
pub const LEARNING_MEMORY_CAP: f64 = 0.9;

/// Memory strength cap when recovering out of relearning
pub const RELEARNING_MEMORY_CAP: f64 = 0.7;

/// Retention probability never exceeds this, regardless of confidence
pub const MAX_RETENTION: f64 = 0.95;

/// Base decay rate; divided by the stability factor per elapsed day
pub const MEMORY_DECAY_RATE: f64 = 0.1;

/// Response under half the historical average counts as fast
pub const FAST_RESPONSE_RATIO: f64 = 0.5;

/// Response over double the historical average counts as slow
pub const SLOW_RESPONSE_RATIO: f64 = 2.0;

/// Morning and evening review windows (hour of day, UTC-naive)
pub const DEFAULT_PREFERRED_HOURS: [u32; 6] = [8, 9, 10, 19, 20, 21];

// ============================================================================
// GRADE AND EASE
// ============================================================================

/// Clamp a caller-supplied grade onto the 0-5 scale.
pub fn clamp_quality(quality: i32) -> i32 {
    quality.clamp(0, 5)
}

/// SM-2 ease update: `ease + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))`,
/// clamped into `[min_ease, max_ease]`.
///
/// Quality 5 raises ease by 0.1, quality 4 leaves it unchanged, anything
/// lower pulls it down (quality 3 by 0.14, quality 0 by 0.8).
pub fn next_ease_factor(ease: f64, quality: i32, min_ease: f64, max_ease: f64) -> f64 {
    let q = clamp_quality(quality) as f64;
    let delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
    (ease + delta).clamp(min_ease, max_ease)
}

// ============================================================================
// INTERVALS
// ============================================================================

/// Next interval for a passing review of a graduated card.
///
/// Classic SM-2 rungs: anything under a day snaps to 1, anything under six
/// days snaps to 6, beyond that the previous interval grows by the ease
/// factor scaled by a global modifier.
pub fn review_interval(previous: f64, ease: f64, interval_modifier: f64) -> f64 {
    if previous < 1.0 {
        1.0
    } else if previous < 6.0 {
        6.0
    } else {
        (previous * ease * interval_modifier).round()
    }
}

/// Proportional interval shrink for a card's lapse history:
/// `min(0.5, lapses * 0.1)`.
pub fn lapse_penalty(lapses: u32) -> f64 {
    (lapses as f64 * 0.1).min(0.5)
}

/// Proportional interval growth for a correct streak beyond 5:
/// `min(0.3, (streak - 5) * 0.05)`.
pub fn streak_bonus(correct_streak: u32) -> f64 {
    if correct_streak > 5 {
        ((correct_streak - 5) as f64 * 0.05).min(0.3)
    } else {
        0.0
    }
}

// ============================================================================
// MEMORY MODEL
// ============================================================================

/// Memory strength granted by the very first passing answer:
/// `0.3 + (quality - 1) * 0.15`, capped at the learning-phase ceiling.
pub fn initial_memory_strength(quality: i32) -> f64 {
    let q = clamp_quality(quality) as f64;
    (0.3 + (q - 1.0) * 0.15).clamp(MIN_MEMORY_STRENGTH, LEARNING_MEMORY_CAP)
}

/// Stored strength decayed exponentially over `days_elapsed`.
///
/// Decay rate is `0.1 / stability`; higher stability means slower decay.
/// The result never drops below 0.1. Stability is floored at 0.1 before the
/// division so a degenerate snapshot cannot divide by zero.
pub fn decayed_memory_strength(strength: f64, stability: f64, days_elapsed: f64) -> f64 {
    let rate = MEMORY_DECAY_RATE / stability.max(0.1);
    (strength * (-rate * days_elapsed).exp()).max(MIN_MEMORY_STRENGTH)
}

/// Forgetting-curve recall probability at `days_elapsed` since last review.
///
/// `min(0.95, exp(-days / (stability * ease)) * strength)`, never negative.
/// Stability and ease are floored at 0.1 so degenerate snapshots stay total.
pub fn retention_probability(strength: f64, stability: f64, ease: f64, days_elapsed: f64) -> f64 {
    let scale = stability.max(0.1) * ease.max(0.1);
    ((-days_elapsed / scale).exp() * strength).clamp(0.0, MAX_RETENTION)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_deltas_per_quality() {
        // q=5: +0.1, q=4: +0.0, q=3: -0.14, q=0: -0.8
        assert!((next_ease_factor(2.5, 5, 1.3, 3.5) - 2.6).abs() < 1e-9);
        assert!((next_ease_factor(2.5, 4, 1.3, 3.5) - 2.5).abs() < 1e-9);
        assert!((next_ease_factor(2.5, 3, 1.3, 3.5) - 2.36).abs() < 1e-9);
        assert!((next_ease_factor(2.5, 0, 1.3, 3.5) - 1.7).abs() < 1e-9);
    }

    #[test]
    fn test_ease_clamps_at_bounds() {
        assert_eq!(next_ease_factor(1.31, 0, 1.3, 3.5), 1.3);
        assert_eq!(next_ease_factor(3.45, 5, 1.3, 3.5), 3.5);
    }

    #[test]
    fn test_ease_clamps_out_of_domain_quality() {
        assert_eq!(
            next_ease_factor(2.5, 9, 1.3, 3.5),
            next_ease_factor(2.5, 5, 1.3, 3.5)
        );
        assert_eq!(
            next_ease_factor(2.5, -4, 1.3, 3.5),
            next_ease_factor(2.5, 0, 1.3, 3.5)
        );
    }

    #[test]
    fn test_review_interval_rungs() {
        assert_eq!(review_interval(0.5, 2.5, 1.0), 1.0);
        assert_eq!(review_interval(1.0, 2.5, 1.0), 6.0);
        assert_eq!(review_interval(5.9, 2.5, 1.0), 6.0);
        assert_eq!(review_interval(10.0, 2.5, 1.0), 25.0);
    }

    #[test]
    fn test_review_interval_honors_modifier() {
        assert_eq!(review_interval(10.0, 2.5, 0.8), 20.0);
    }

    #[test]
    fn test_lapse_penalty_caps_at_half() {
        assert_eq!(lapse_penalty(0), 0.0);
        assert!((lapse_penalty(3) - 0.3).abs() < 1e-9);
        assert_eq!(lapse_penalty(5), 0.5);
        assert_eq!(lapse_penalty(40), 0.5);
    }

    #[test]
    fn test_streak_bonus_starts_past_five() {
        assert_eq!(streak_bonus(0), 0.0);
        assert_eq!(streak_bonus(5), 0.0);
        assert!((streak_bonus(10) - 0.25).abs() < 1e-9);
        assert!((streak_bonus(50) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_initial_memory_strength_scale() {
        assert!((initial_memory_strength(3) - 0.6).abs() < 1e-9);
        assert!((initial_memory_strength(4) - 0.75).abs() < 1e-9);
        assert!((initial_memory_strength(5) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_decay_floors_and_respects_stability() {
        let fast = decayed_memory_strength(0.8, 0.5, 10.0);
        let slow = decayed_memory_strength(0.8, 2.0, 10.0);
        assert!(slow > fast, "higher stability decays slower");
        assert_eq!(decayed_memory_strength(0.8, 1.0, 10_000.0), 0.1);
        // Zero stability must not divide by zero
        assert!(decayed_memory_strength(0.8, 0.0, 1.0).is_finite());
    }

    #[test]
    fn test_retention_bounds() {
        for days in [0.0, 0.5, 3.0, 30.0, 3000.0] {
            let r = retention_probability(0.95, 2.0, 3.5, days);
            assert!((0.0..=MAX_RETENTION).contains(&r));
        }
    }

    #[test]
    fn test_retention_strictly_decreases_over_time() {
        let mut last = f64::INFINITY;
        for days in [0.0, 1.0, 5.0, 20.0, 100.0] {
            let r = retention_probability(0.9, 1.0, 2.5, days);
            assert!(r < last, "retention must strictly decrease as days grow");
            last = r;
        }
    }
}
