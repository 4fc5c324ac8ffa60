//! Scheduling core for a study planner: SM-2 flashcard review scheduling
//! and greedy weekly distribution of backlog topics over daily time budgets.
//!
//! The functions in `srs` and `planner` are pure. `services` connects them
//! to application-provided storage through the traits in `store`.

pub mod config;
pub mod domain;
pub mod planner;
pub mod services;
pub mod srs;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use domain::{BacklogTopic, DayBudget, ReviewRating, ReviewState, ScheduledTask};
pub use planner::{generate_weekly_plan, PlanError, WeeklyPlan};
pub use srs::compute_next_review;
