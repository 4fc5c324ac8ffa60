use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A topic waiting to be placed on a study day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogTopic {
  pub id: i64,
  /// None (or zero) means "use the planner default"
  pub estimated_minutes: Option<u32>,
  pub subject: Option<String>,
  pub chapter: Option<String>,
}

impl BacklogTopic {
  pub fn new(id: i64, estimated_minutes: Option<u32>) -> Self {
    Self {
      id,
      estimated_minutes,
      subject: None,
      chapter: None,
    }
  }

  pub fn with_subject(mut self, subject: impl Into<String>, chapter: Option<String>) -> Self {
    self.subject = Some(subject.into());
    self.chapter = chapter;
    self
  }

  /// Estimated duration, falling back to `default_minutes` when unset
  pub fn minutes_or(&self, default_minutes: u32) -> u32 {
    match self.estimated_minutes {
      Some(m) if m > 0 => m,
      _ => default_minutes,
    }
  }
}

/// "Study this topic on this date"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
  pub topic: BacklogTopic,
  pub date: NaiveDate,
}

impl ScheduledTask {
  pub fn new(topic: BacklogTopic, date: NaiveDate) -> Self {
    Self { topic, date }
  }

  pub fn topic_id(&self) -> i64 {
    self.topic.id
  }
}

/// Minute budget of one plan day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBudget {
  pub date: NaiveDate,
  pub capacity_minutes: f64,
  pub consumed_minutes: u32,
}

impl DayBudget {
  pub fn new(date: NaiveDate, daily_hours: f64) -> Self {
    Self {
      date,
      capacity_minutes: daily_hours * 60.0,
      consumed_minutes: 0,
    }
  }

  pub fn is_full(&self) -> bool {
    f64::from(self.consumed_minutes) >= self.capacity_minutes
  }

  /// Minutes left before the cap; zero once full (even when overshot)
  pub fn remaining_minutes(&self) -> f64 {
    (self.capacity_minutes - f64::from(self.consumed_minutes)).max(0.0)
  }

  pub fn consume(&mut self, minutes: u32) {
    self.consumed_minutes = self.consumed_minutes.saturating_add(minutes);
  }
}
