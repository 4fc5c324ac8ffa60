//! Test fixtures shared across modules.
//!
//! Provides fixed clocks and dates so scheduling tests are deterministic,
//! plus a store that fails every call for error-path tests.

use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone, Utc};
use std::ops::RangeInclusive;

use crate::domain::{BacklogTopic, ReviewState, ScheduledTask};
use crate::store::{BacklogSource, CardStore, MemoryStore, ScheduleStore, StoreError};

/// Fixed instant `hours` after Monday 2025-03-10 09:00 UTC
pub fn at(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap() + Duration::hours(hours)
}

/// Monday 2025-03-10
pub fn monday() -> NaiveDate {
    at(0).date_naive()
}

/// `offset` days after `monday()`
pub fn day(offset: u64) -> NaiveDate {
    monday() + Days::new(offset)
}

/// Add topics with ids 1..=n for `user_id`, one per estimate
pub fn seed_topics(store: &MemoryStore, user_id: i64, minutes: &[Option<u32>]) {
    for (i, m) in minutes.iter().enumerate() {
        store
            .add_topic(user_id, BacklogTopic::new(i as i64 + 1, *m))
            .unwrap_or_else(|e| panic!("seeding topic {} failed: {}", i + 1, e));
    }
}

/// Store whose every operation reports `StoreError::Unavailable`
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl CardStore for FailingStore {
    fn load_review_state(&self, _card_id: i64) -> Result<ReviewState, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn save_review_state(&self, _card_id: i64, _state: &ReviewState) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

impl BacklogSource for FailingStore {
    fn fetch_unscheduled_topics(&self, _user_id: i64) -> Result<Vec<BacklogTopic>, StoreError> {
        Err(StoreError::Unavailable)
    }
}

impl ScheduleStore for FailingStore {
    fn clear_uncompleted_tasks(&self, _user_id: i64, _dates: RangeInclusive<NaiveDate>) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn insert_tasks(&self, _user_id: i64, _tasks: &[ScheduledTask]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    fn uncompleted_tasks(&self, _user_id: i64, _dates: RangeInclusive<NaiveDate>) -> Result<Vec<ScheduledTask>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn replace_uncompleted_tasks(
        &self,
        _user_id: i64,
        _dates: RangeInclusive<NaiveDate>,
        _tasks: &[ScheduledTask],
    ) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable)
    }
}
