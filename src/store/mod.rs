//! Storage collaborators consumed by the services.
//!
//! The scheduling core performs no I/O. The application supplies these
//! traits (typically backed by its database) and hands them to
//! `ReviewService` / `PlanService`.

pub mod memory;

use chrono::NaiveDate;
use std::ops::RangeInclusive;

use crate::domain::{BacklogTopic, ReviewState, ScheduledTask};

pub use memory::MemoryStore;

/// Per-card review state persistence
pub trait CardStore: Send + Sync {
    fn load_review_state(&self, card_id: i64) -> Result<ReviewState, StoreError>;
    fn save_review_state(&self, card_id: i64, state: &ReviewState) -> Result<(), StoreError>;
}

/// Source of topics awaiting a study day
pub trait BacklogSource: Send + Sync {
    /// Topics of `user_id` not present in any stored task, in query order
    fn fetch_unscheduled_topics(&self, user_id: i64) -> Result<Vec<BacklogTopic>, StoreError>;
}

/// Scheduled task persistence.
///
/// `PlanService` reads the window with `uncompleted_tasks` and writes the new
/// plan with `replace_uncompleted_tasks`, which must delete and insert
/// atomically (one transaction for database-backed stores) so a failure
/// cannot leave a half-replaced week.
pub trait ScheduleStore: Send + Sync {
    /// Delete the user's uncompleted tasks dated within `dates`; completed ones stay
    fn clear_uncompleted_tasks(&self, user_id: i64, dates: RangeInclusive<NaiveDate>) -> Result<usize, StoreError>;
    fn insert_tasks(&self, user_id: i64, tasks: &[ScheduledTask]) -> Result<(), StoreError>;

    /// The user's uncompleted tasks dated within `dates`, in stored order
    fn uncompleted_tasks(&self, user_id: i64, dates: RangeInclusive<NaiveDate>) -> Result<Vec<ScheduledTask>, StoreError>;

    /// Clear and insert as one unit: on error the stored tasks are unchanged.
    /// Returns the number of tasks cleared.
    fn replace_uncompleted_tasks(
        &self,
        user_id: i64,
        dates: RangeInclusive<NaiveDate>,
        tasks: &[ScheduledTask],
    ) -> Result<usize, StoreError>;
}

/// Storage errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    Unavailable,
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(what) => write!(f, "Not found: {}", what),
            StoreError::Unavailable => write!(f, "Storage unavailable"),
            StoreError::Backend(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl StoreError {
    /// Returns a user-facing error message without exposing backend details.
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "Not found",
            StoreError::Unavailable => "Storage unavailable",
            StoreError::Backend(_) => "Storage error",
        }
    }
}

impl std::error::Error for StoreError {}
