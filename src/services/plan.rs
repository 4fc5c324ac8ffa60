//! Weekly plan regeneration against injected storage.

use chrono::NaiveDate;
use std::cmp::Ordering;

use super::ServiceError;
use crate::config::{PlannerConfig, PLAN_DAYS};
use crate::domain::BacklogTopic;
use crate::planner::{self, PlanSettings, WeeklyPlan};
use crate::store::{BacklogSource, ScheduleStore};

type BacklogOrder = Box<dyn Fn(&BacklogTopic, &BacklogTopic) -> Ordering + Send + Sync>;

/// Rebuilds a user's study week from their backlog
pub struct PlanService<B, S> {
    backlog: B,
    schedule: S,
    config: PlannerConfig,
    ordering: Option<BacklogOrder>,
}

impl<B: BacklogSource, S: ScheduleStore> PlanService<B, S> {
    pub fn new(backlog: B, schedule: S, config: PlannerConfig) -> Self {
        Self {
            backlog,
            schedule,
            config,
            ordering: None,
        }
    }

    /// Sort the fetched backlog with `cmp` before distributing it
    pub fn with_ordering<F>(mut self, cmp: F) -> Self
    where
        F: Fn(&BacklogTopic, &BacklogTopic) -> Ordering + Send + Sync + 'static,
    {
        self.ordering = Some(Box::new(cmp));
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Replace the uncompleted tasks of the 7 days from `start` with a fresh plan.
    ///
    /// `daily_hours` falls back to the configured default. The budget is
    /// validated before anything is read. Topics of the window's uncompleted
    /// tasks go back into the backlog ahead of never-scheduled topics, then
    /// the window is swapped in one `replace_uncompleted_tasks` call, so a
    /// failure at any step leaves the stored week as it was. Completed tasks
    /// in the window are kept and their topics are not scheduled again.
    pub fn regenerate_week(
        &self,
        user_id: i64,
        start: NaiveDate,
        daily_hours: Option<f64>,
    ) -> Result<WeeklyPlan, ServiceError> {
        let settings = PlanSettings {
            daily_hours: daily_hours.unwrap_or(self.config.daily_hours),
            days: PLAN_DAYS,
            default_topic_minutes: self.config.default_topic_minutes,
        };
        settings.validate()?;

        let dates = planner::plan_dates(start, settings.days)?;
        let (first, last) = match (dates.first(), dates.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(planner::PlanError::EmptyWindow.into()),
        };

        let mut backlog: Vec<BacklogTopic> = Vec::new();
        for task in self.schedule.uncompleted_tasks(user_id, first..=last)? {
            if !backlog.iter().any(|t| t.id == task.topic.id) {
                backlog.push(task.topic);
            }
        }
        for topic in self.backlog.fetch_unscheduled_topics(user_id)? {
            if !backlog.iter().any(|t| t.id == topic.id) {
                backlog.push(topic);
            }
        }
        if let Some(cmp) = &self.ordering {
            planner::sort_backlog(&mut backlog, |a, b| cmp(a, b));
        }

        let plan = planner::plan(&backlog, start, &settings)?;
        let cleared = self
            .schedule
            .replace_uncompleted_tasks(user_id, first..=last, &plan.tasks)?;

        tracing::info!(
            "Planned week {}..{} for user {}: {} tasks ({} cleared), {} topics left over",
            first,
            last,
            user_id,
            plan.tasks.len(),
            cleared,
            plan.unscheduled
        );
        if plan.unscheduled > 0 {
            tracing::debug!("{} backlog topics did not fit at {}h/day", plan.unscheduled, settings.daily_hours);
        }
        Ok(plan)
    }
}
