use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::config::{DEFAULT_TOPIC_MINUTES, PLAN_DAYS};
use crate::domain::{BacklogTopic, DayBudget, ScheduledTask};

/// Inputs that shape a plan besides the backlog itself
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSettings {
  pub daily_hours: f64,
  pub days: u32,
  pub default_topic_minutes: u32,
}

impl PlanSettings {
  /// Seven days at `daily_hours` each, 30 minutes per unestimated topic
  pub fn weekly(daily_hours: f64) -> Self {
    Self {
      daily_hours,
      days: PLAN_DAYS,
      default_topic_minutes: DEFAULT_TOPIC_MINUTES,
    }
  }

  pub fn validate(&self) -> Result<(), PlanError> {
    if !self.daily_hours.is_finite() || self.daily_hours <= 0.0 {
      return Err(PlanError::InvalidBudget(self.daily_hours));
    }
    if self.days == 0 {
      return Err(PlanError::EmptyWindow);
    }
    Ok(())
  }
}

/// Result of distributing a backlog over the plan window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPlan {
  /// Assignments in backlog order
  pub tasks: Vec<ScheduledTask>,
  /// One budget per plan day, in date order
  pub days: Vec<DayBudget>,
  /// Backlog topics that did not fit in the window
  pub unscheduled: usize,
}

impl WeeklyPlan {
  pub fn tasks_on(&self, date: NaiveDate) -> impl Iterator<Item = &ScheduledTask> {
    self.tasks.iter().filter(move |t| t.date == date)
  }

  pub fn start_date(&self) -> Option<NaiveDate> {
    self.days.first().map(|d| d.date)
  }

  pub fn end_date(&self) -> Option<NaiveDate> {
    self.days.last().map(|d| d.date)
  }

  pub fn total_minutes(&self) -> u64 {
    self.days.iter().map(|d| u64::from(d.consumed_minutes)).sum()
  }
}

/// Planner errors.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
  InvalidBudget(f64),
  EmptyWindow,
  DateOutOfRange(NaiveDate),
}

impl std::fmt::Display for PlanError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PlanError::InvalidBudget(hours) => {
        write!(f, "Invalid daily budget: {} hours (must be greater than zero)", hours)
      }
      PlanError::EmptyWindow => write!(f, "Plan window must cover at least one day"),
      PlanError::DateOutOfRange(start) => write!(f, "Plan window starting {} exceeds the calendar", start),
    }
  }
}

impl PlanError {
  /// Returns a user-facing error message.
  pub fn user_message(&self) -> &'static str {
    match self {
      PlanError::InvalidBudget(_) => "Daily study hours must be greater than zero",
      PlanError::EmptyWindow => "Plan must cover at least one day",
      PlanError::DateOutOfRange(_) => "Start date is out of range",
    }
  }
}

impl std::error::Error for PlanError {}

/// Consecutive calendar dates starting at `start`
pub fn plan_dates(start: NaiveDate, days: u32) -> Result<Vec<NaiveDate>, PlanError> {
  (0..days)
    .map(|offset| {
      start
        .checked_add_days(Days::new(u64::from(offset)))
        .ok_or(PlanError::DateOutOfRange(start))
    })
    .collect()
}

/// Greedily pack `backlog` into day budgets, in order, without backtracking.
///
/// A day keeps taking topics while its consumed minutes are below the cap.
/// The check happens before a topic is added, so a day can overshoot by at
/// most one topic and a single topic longer than the whole budget still
/// gets a day. Topics are never split or reordered. Days after the backlog
/// runs out stay empty; topics left when the window is full are counted in
/// `unscheduled`.
pub fn plan(backlog: &[BacklogTopic], start: NaiveDate, settings: &PlanSettings) -> Result<WeeklyPlan, PlanError> {
  settings.validate()?;

  let mut days: Vec<DayBudget> = plan_dates(start, settings.days)?
    .into_iter()
    .map(|date| DayBudget::new(date, settings.daily_hours))
    .collect();

  let mut tasks = Vec::new();
  let mut remaining = backlog.iter().peekable();

  for day in days.iter_mut() {
    while !day.is_full() {
      let Some(topic) = remaining.next() else {
        break;
      };
      day.consume(topic.minutes_or(settings.default_topic_minutes));
      tasks.push(ScheduledTask::new(topic.clone(), day.date));
    }
    if remaining.peek().is_none() {
      break;
    }
  }

  Ok(WeeklyPlan {
    tasks,
    days,
    unscheduled: remaining.count(),
  })
}

/// `plan`, keeping only the task list
pub fn distribute(
  backlog: &[BacklogTopic],
  start: NaiveDate,
  settings: &PlanSettings,
) -> Result<Vec<ScheduledTask>, PlanError> {
  plan(backlog, start, settings).map(|p| p.tasks)
}

/// Spread `backlog` over the seven days from `start` at `daily_hours` per day.
///
/// Callers must clear uncompleted tasks in the window before persisting the
/// result, and should do the clear and insert in one transaction.
pub fn generate_weekly_plan(
  backlog: &[BacklogTopic],
  start: NaiveDate,
  daily_hours: f64,
) -> Result<Vec<ScheduledTask>, PlanError> {
  distribute(backlog, start, &PlanSettings::weekly(daily_hours))
}
