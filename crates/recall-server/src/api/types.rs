//! Request/response types for the scheduling facade
//!
//! Inbound types use `deny_unknown_fields` to reject payloads that were
//! built against a different schema. Card snapshots round-trip through
//! RFC 3339 timestamp strings losslessly; the epoch-millis fields on the
//! responses are derived views for clients that prefer numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use recall_core::{BatchReport, BatchSummary, LearningState, ReviewCard, ScheduledReview};

// ============================================================================
// SCHEDULE
// ============================================================================

/// One review event to schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScheduleRequest {
    pub user_id: String,
    pub item_id: String,
    /// Grade on the 0-5 scale; out-of-range values are rejected here
    pub quality: i32,
    /// Seconds the learner took to answer
    pub response_time: Option<f64>,
    pub item_type: Option<String>,
    /// Current stored snapshot; omitted for a first encounter
    pub card: Option<ReviewCard>,
}

/// Updated scheduling parameters plus the full post-review snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub next_review_epoch_ms: i64,
    pub interval: f64,
    pub ease_factor: f64,
    pub memory_strength: f64,
    pub learning_state: LearningState,
    pub card: ReviewCard,
}

impl From<ScheduledReview> for ScheduleResponse {
    fn from(scheduled: ScheduledReview) -> Self {
        Self {
            next_review_epoch_ms: scheduled.card.next_review.timestamp_millis(),
            interval: scheduled.outcome.interval,
            ease_factor: scheduled.outcome.ease_factor,
            memory_strength: scheduled.outcome.memory_strength,
            learning_state: scheduled.outcome.learning_state,
            card: scheduled.card,
        }
    }
}

// ============================================================================
// RETENTION
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RetentionRequest {
    pub card: ReviewCard,
    /// Instant to evaluate at; defaults to now
    pub target_instant: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionResponse {
    pub retention_probability: f64,
    pub current_memory_strength: f64,
    pub days_since_last_review: i64,
    pub priority_score: f64,
}

// ============================================================================
// OPTIMAL TIME
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptimalTimeRequest {
    pub card: ReviewCard,
    /// Hours of day (0-23) the learner prefers; defaults to morning/evening
    pub preferred_hours: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalTimeResponse {
    pub scheduled_review_epoch_ms: i64,
    pub optimal_review_epoch_ms: i64,
    /// How far the snap moved the schedule (0 when already preferred)
    pub adjustment_ms: i64,
}

// ============================================================================
// BATCH
// ============================================================================

/// Entries are raw JSON values so one malformed entry can fail on its own
/// instead of rejecting the whole batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BatchScheduleRequest {
    pub reviews: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResultEntry {
    pub index: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScheduleResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchScheduleResponse {
    pub results: Vec<BatchResultEntry>,
    pub summary: BatchSummary,
}

impl From<BatchReport> for BatchScheduleResponse {
    fn from(report: BatchReport) -> Self {
        let results = report
            .results
            .into_iter()
            .map(|item| match item.result {
                Ok(scheduled) => BatchResultEntry {
                    index: item.index,
                    success: true,
                    result: Some(scheduled.into()),
                    error: None,
                },
                Err(error) => BatchResultEntry {
                    index: item.index,
                    success: false,
                    result: None,
                    error: Some(error.to_string()),
                },
            })
            .collect();
        Self {
            results,
            summary: report.summary,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_schedule_request_rejects_unknown_fields() {
        let json = r#"{"userId": "u1", "itemId": "i1", "quality": 4, "grade": 4}"#;
        assert!(serde_json::from_str::<ScheduleRequest>(json).is_err());
    }

    #[test]
    fn test_schedule_request_optional_fields_default() {
        let json = r#"{"userId": "u1", "itemId": "i1", "quality": 4}"#;
        let request: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert!(request.response_time.is_none());
        assert!(request.card.is_none());
    }

    #[test]
    fn test_card_timestamps_roundtrip_through_text() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
            + chrono::Duration::milliseconds(123)
            + chrono::Duration::microseconds(456);
        let mut card = ReviewCard::new("u1", "i1", now);
        card.last_reviewed = Some(now);

        let json = serde_json::to_string(&card).unwrap();
        let back: ReviewCard = serde_json::from_str(&json).unwrap();
        assert_eq!(back.next_review, card.next_review);
        assert_eq!(back.last_reviewed, card.last_reviewed);
        assert_eq!(back.created_at, card.created_at);
        // Timestamps travel as RFC 3339 text, not numbers
        assert!(json.contains("\"nextReview\":\"2026-03-01T09:00:00.123456"));
    }

    #[test]
    fn test_batch_report_maps_to_response_shape() {
        use recall_core::{schedule_one, ReviewSubmission, Scheduler};

        let scheduler = Scheduler::new();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let submission = ReviewSubmission {
            user_id: Some("u1".to_string()),
            item_id: Some("i1".to_string()),
            quality: Some(4),
            ..Default::default()
        };
        let scheduled = schedule_one(&scheduler, submission, now).unwrap();

        let response = ScheduleResponse::from(scheduled);
        assert_eq!(response.learning_state, LearningState::Learning);
        assert_eq!(
            response.next_review_epoch_ms,
            response.card.next_review.timestamp_millis()
        );
    }
}
