pub mod ordering;
pub mod weekly;

pub use ordering::{by_subject, shortest_first, sort_backlog};
pub use weekly::{distribute, generate_weekly_plan, plan, plan_dates, PlanError, PlanSettings, WeeklyPlan};
