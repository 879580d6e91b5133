//! Batch review coordination
//!
//! Applies the engine independently to an ordered list of review
//! submissions. Each item is a self-contained transaction: a malformed or
//! incomplete entry is captured as a per-item failure and never aborts its
//! siblings. Items are processed sequentially; nothing in the report depends
//! on ordering between items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::card::ReviewCard;
use crate::scheduler::{ReviewOutcome, Scheduler};

// ============================================================================
// ERRORS
// ============================================================================

/// Why a single review submission was rejected.
///
/// The engine itself is total; everything here is caught by validation
/// before the engine runs.
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("quality {0} is outside the 0-5 grade scale")]
    QualityOutOfRange(i32),

    #[error("malformed review entry: {0}")]
    Malformed(String),
}

// ============================================================================
// SUBMISSIONS
// ============================================================================

/// One review event as submitted by a caller.
///
/// Every field is optional so a batch can carry incomplete entries through
/// deserialization and fail them individually during validation. A missing
/// card snapshot materializes a fresh card with defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReviewSubmission {
    pub user_id: Option<String>,
    pub item_id: Option<String>,
    pub quality: Option<i32>,
    pub response_time: Option<f64>,
    pub item_type: Option<String>,
    pub card: Option<ReviewCard>,
}

/// A completed review transaction: the updated card plus the engine outcome
/// that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReview {
    pub card: ReviewCard,
    pub outcome: ReviewOutcome,
}

/// Validate one submission and run the full review transaction.
///
/// Rejects missing identity/quality and out-of-domain grades before the
/// engine is reached; the engine call plus the card update happen together,
/// so the returned card is the post-review snapshot in its entirety.
pub fn schedule_one(
    scheduler: &Scheduler,
    submission: ReviewSubmission,
    now: DateTime<Utc>,
) -> Result<ScheduledReview, ScheduleError> {
    let user_id = submission
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or(ScheduleError::MissingField("userId"))?;
    let item_id = submission
        .item_id
        .filter(|id| !id.is_empty())
        .ok_or(ScheduleError::MissingField("itemId"))?;
    let quality = submission
        .quality
        .ok_or(ScheduleError::MissingField("quality"))?;
    if !(0..=5).contains(&quality) {
        return Err(ScheduleError::QualityOutOfRange(quality));
    }

    let mut card = match submission.card {
        Some(card) => card,
        None => {
            let card = ReviewCard::new(user_id, item_id, now);
            match submission.item_type {
                Some(item_type) => card.with_item_type(item_type),
                None => card,
            }
        }
    };

    let outcome = scheduler.next_review(&card, quality, submission.response_time, now);
    card.apply_review(&outcome, submission.response_time, now);

    Ok(ScheduledReview { card, outcome })
}

// ============================================================================
// BATCH COORDINATOR
// ============================================================================

/// One entry of a batch: either a parsed submission or the error its
/// deserialization already produced.
pub type BatchEntry = Result<ReviewSubmission, ScheduleError>;

/// Per-item result, tagged with the submission's position in the batch.
#[derive(Debug)]
pub struct BatchItemResult {
    pub index: usize,
    pub result: Result<ScheduledReview, ScheduleError>,
}

/// Aggregate counts over one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Everything a batch run produced.
#[derive(Debug)]
pub struct BatchReport {
    pub results: Vec<BatchItemResult>,
    pub summary: BatchSummary,
}

/// Applies the engine to each batch entry independently.
pub struct BatchCoordinator<'a> {
    scheduler: &'a Scheduler,
}

impl<'a> BatchCoordinator<'a> {
    pub fn new(scheduler: &'a Scheduler) -> Self {
        Self { scheduler }
    }

    /// Run every entry through the review transaction, isolating failures.
    pub fn run(&self, entries: Vec<BatchEntry>, now: DateTime<Utc>) -> BatchReport {
        let total = entries.len();
        let mut successful = 0;
        let mut failed = 0;

        let results = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let result =
                    entry.and_then(|submission| schedule_one(self.scheduler, submission, now));
                match &result {
                    Ok(_) => successful += 1,
                    Err(error) => {
                        failed += 1;
                        warn!(index, %error, "batch review item failed");
                    }
                }
                BatchItemResult { index, result }
            })
            .collect();

        BatchReport {
            results,
            summary: BatchSummary {
                total,
                successful,
                failed,
            },
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::LearningState;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn submission(user: &str, item: &str, quality: i32) -> ReviewSubmission {
        ReviewSubmission {
            user_id: Some(user.to_string()),
            item_id: Some(item.to_string()),
            quality: Some(quality),
            ..Default::default()
        }
    }

    #[test]
    fn test_schedule_one_materializes_a_fresh_card() {
        let scheduler = Scheduler::new();
        let mut sub = submission("u1", "i9", 4);
        sub.item_type = Some("vocabulary".to_string());

        let scheduled = schedule_one(&scheduler, sub, t0()).unwrap();
        assert_eq!(scheduled.card.user_id, "u1");
        assert_eq!(scheduled.card.item_id, "i9");
        assert_eq!(scheduled.card.item_type.as_deref(), Some("vocabulary"));
        assert_eq!(scheduled.card.learning_state, LearningState::Learning);
        assert_eq!(scheduled.card.total_reviews, 1);
        assert_eq!(scheduled.card.last_reviewed, Some(t0()));
    }

    #[test]
    fn test_schedule_one_reuses_the_supplied_snapshot() {
        let scheduler = Scheduler::new();
        let mut card = ReviewCard::new("u1", "i1", t0());
        card.total_reviews = 5;
        card.correct_streak = 2;

        let mut sub = submission("u1", "i1", 4);
        sub.card = Some(card);

        let scheduled = schedule_one(&scheduler, sub, t0()).unwrap();
        assert_eq!(scheduled.card.total_reviews, 6);
        assert_eq!(scheduled.card.correct_streak, 3);
    }

    #[test]
    fn test_schedule_one_rejects_missing_fields() {
        let scheduler = Scheduler::new();

        let mut no_user = submission("", "i1", 4);
        no_user.user_id = Some(String::new());
        assert_eq!(
            schedule_one(&scheduler, no_user, t0()),
            Err(ScheduleError::MissingField("userId"))
        );

        let mut no_item = submission("u1", "i1", 4);
        no_item.item_id = None;
        assert_eq!(
            schedule_one(&scheduler, no_item, t0()),
            Err(ScheduleError::MissingField("itemId"))
        );

        let mut no_quality = submission("u1", "i1", 4);
        no_quality.quality = None;
        assert_eq!(
            schedule_one(&scheduler, no_quality, t0()),
            Err(ScheduleError::MissingField("quality"))
        );
    }

    #[test]
    fn test_schedule_one_rejects_out_of_domain_quality() {
        let scheduler = Scheduler::new();
        assert_eq!(
            schedule_one(&scheduler, submission("u1", "i1", 7), t0()),
            Err(ScheduleError::QualityOutOfRange(7))
        );
        assert_eq!(
            schedule_one(&scheduler, submission("u1", "i1", -1), t0()),
            Err(ScheduleError::QualityOutOfRange(-1))
        );
    }

    #[test]
    fn test_batch_all_valid() {
        let scheduler = Scheduler::new();
        let coordinator = BatchCoordinator::new(&scheduler);
        let entries = vec![
            Ok(submission("u1", "i1", 4)),
            Ok(submission("u1", "i2", 2)),
            Ok(submission("u2", "i1", 5)),
        ];

        let report = coordinator.run(entries, t0());
        assert_eq!(
            report.summary,
            BatchSummary { total: 3, successful: 3, failed: 0 }
        );
        assert!(report.results.iter().all(|r| r.result.is_ok()));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let scheduler = Scheduler::new();
        let coordinator = BatchCoordinator::new(&scheduler);
        let entries: Vec<BatchEntry> = vec![
            Ok(submission("u1", "i1", 4)),
            Ok(ReviewSubmission::default()),
            Err(ScheduleError::Malformed("not an object".to_string())),
            Ok(submission("u1", "i2", 9)),
            Ok(submission("u2", "i1", 3)),
        ];

        let report = coordinator.run(entries, t0());
        assert_eq!(report.summary.total, 5);
        assert_eq!(report.summary.successful, 2);
        assert_eq!(report.summary.failed, 3);
        assert_eq!(
            report.summary.successful + report.summary.failed,
            report.summary.total
        );

        // Well-formed entries succeed independently of their neighbors
        assert!(report.results[0].result.is_ok());
        assert!(report.results[4].result.is_ok());
        assert_eq!(report.results[2].index, 2);
        assert_eq!(
            report.results[3].result,
            Err(ScheduleError::QualityOutOfRange(9))
        );
    }

    #[test]
    fn test_submission_deserializes_leniently() {
        let sub: ReviewSubmission =
            serde_json::from_str(r#"{"userId": "u1", "quality": 3}"#).unwrap();
        assert_eq!(sub.user_id.as_deref(), Some("u1"));
        assert!(sub.item_id.is_none());

        // Unknown fields are still an error - they signal a malformed payload
        assert!(serde_json::from_str::<ReviewSubmission>(r#"{"grade": 3}"#).is_err());
    }
}
