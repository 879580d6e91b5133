//! Recall Scheduler Benchmarks
//!
//! Benchmarks for the engine hot path using Criterion.
//! Run with: cargo bench -p recall-core

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recall_core::{LearningState, ReviewCard, Scheduler};

fn graduated_card() -> ReviewCard {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let mut card = ReviewCard::new("bench-user", "bench-item", now);
    card.learning_state = LearningState::Review;
    card.graduated = true;
    card.interval = 12.0;
    card.memory_strength = 0.8;
    card.correct_streak = 7;
    card.lapses = 2;
    card.average_response_time = 5.0;
    card.last_reviewed = Some(now);
    card
}

fn bench_next_review(c: &mut Criterion) {
    let scheduler = Scheduler::new();
    let card = graduated_card();
    let now = Utc.with_ymd_and_hms(2026, 3, 13, 9, 0, 0).unwrap();

    c.bench_function("next_review_graduated", |b| {
        b.iter(|| {
            for quality in 0..=5 {
                black_box(scheduler.next_review(black_box(&card), quality, Some(4.0), now));
            }
        })
    });
}

fn bench_full_review_transaction(c: &mut Criterion) {
    let scheduler = Scheduler::new();
    let now = Utc.with_ymd_and_hms(2026, 3, 13, 9, 0, 0).unwrap();

    c.bench_function("apply_review_transaction", |b| {
        b.iter(|| {
            let mut card = graduated_card();
            let outcome = scheduler.next_review(&card, 4, Some(4.0), now);
            card.apply_review(&outcome, Some(4.0), now);
            black_box(card);
        })
    });
}

fn bench_retention_probability(c: &mut Criterion) {
    let scheduler = Scheduler::new();
    let card = graduated_card();
    let at = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();

    c.bench_function("retention_probability", |b| {
        b.iter(|| {
            black_box(scheduler.retention_probability(black_box(&card), at));
        })
    });
}

fn bench_priority_score(c: &mut Criterion) {
    let card = graduated_card();
    let at = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();

    c.bench_function("priority_score", |b| {
        b.iter(|| {
            black_box(black_box(&card).priority_score(at));
        })
    });
}

criterion_group!(
    benches,
    bench_next_review,
    bench_full_review_transaction,
    bench_retention_probability,
    bench_priority_score
);
criterion_main!(benches);
