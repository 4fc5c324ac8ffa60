pub mod plan;
pub mod review;

pub use plan::{BacklogTopic, DayBudget, ScheduledTask};
pub use review::{RatingParseError, ReviewRating, ReviewState, ReviewStateError};
