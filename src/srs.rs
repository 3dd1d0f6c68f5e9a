//! Spaced repetition scheduling.
//!
//! Levels index into a fixed table of review intervals. A grade moves the
//! level and the next review lands `INTERVAL_DAYS[level]` days after the
//! moment of grading.

use crate::models::{Grade, Record, SrsState};

/// Review intervals in days, indexed by level.
pub const INTERVAL_DAYS: [i64; 7] = [1, 3, 7, 14, 30, 90, 180];

pub const DAY_MS: i64 = 86_400_000;

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn last_level() -> usize {
    INTERVAL_DAYS.len() - 1
}

pub fn next_level(level: usize, grade: Grade) -> usize {
    let level = level.min(last_level());
    match grade {
        Grade::Fail => 0,
        Grade::Hard => level,
        Grade::Good => (level + 1).min(last_level()),
        Grade::Easy => (level + 2).min(last_level()),
    }
}

/// New scheduling state after grading at `now` (ms since epoch).
pub fn schedule(state: &SrsState, grade: Grade, now: i64) -> SrsState {
    let level = next_level(state.level(), grade);
    SrsState {
        srs_level: level,
        next_review: Some(now + INTERVAL_DAYS[level] * DAY_MS),
    }
}

/// Copy of `item` with its scheduling fields updated. Content is untouched.
pub fn rate(item: &Record, grade: Grade, now: i64) -> Record {
    let mut updated = item.clone();
    *updated.srs_mut() = schedule(item.srs(), grade, now);
    updated
}

pub fn due_items<'a, I>(items: I, now: i64) -> Vec<Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    items
        .into_iter()
        .filter(|item| item.is_due(now))
        .cloned()
        .collect()
}
