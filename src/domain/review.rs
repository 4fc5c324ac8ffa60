use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::{INITIAL_EASE_FACTOR, MIN_EASE_FACTOR};

/// User's recall rating after seeing a card's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewRating {
  Again,
  Hard,
  Good,
  Easy,
}

impl ReviewRating {
  pub const ALL: [ReviewRating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

  /// SM-2 quality score on the 0-5 scale
  pub fn quality(&self) -> u8 {
    match self {
      Self::Again => 0,
      Self::Hard => 3,
      Self::Good => 4,
      Self::Easy => 5,
    }
  }

  pub fn from_quality(value: u8) -> Option<Self> {
    match value {
      0 => Some(Self::Again),
      3 => Some(Self::Hard),
      4 => Some(Self::Good),
      5 => Some(Self::Easy),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Again => "again",
      Self::Hard => "hard",
      Self::Good => "good",
      Self::Easy => "easy",
    }
  }

  /// True when the card was remembered (quality >= 3)
  pub fn is_recalled(&self) -> bool {
    self.quality() >= 3
  }
}

impl std::fmt::Display for ReviewRating {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ReviewRating {
  type Err = RatingParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "again" => Ok(Self::Again),
      "hard" => Ok(Self::Hard),
      "good" => Ok(Self::Good),
      "easy" => Ok(Self::Easy),
      _ => Err(RatingParseError(s.to_string())),
    }
  }
}

/// Raw rating input outside the four accepted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingParseError(pub String);

impl std::fmt::Display for RatingParseError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Invalid rating '{}': expected again, hard, good or easy", self.0)
  }
}

impl RatingParseError {
  pub fn user_message(&self) -> &'static str {
    "Rating must be one of: again, hard, good, easy"
  }
}

impl std::error::Error for RatingParseError {}

/// Per-card memory state driven by the SM-2 scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
  /// Repetition box; 0 = never recalled, reset to 1 on "again"
  pub box_level: i64,
  pub interval_days: i64,
  pub ease_factor: f64,
  pub next_review_at: DateTime<Utc>,
  pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewState {
  /// State of a freshly created flashcard, due immediately
  pub fn new(now: DateTime<Utc>) -> Self {
    Self {
      box_level: 0,
      interval_days: 0,
      ease_factor: INITIAL_EASE_FACTOR,
      next_review_at: now,
      last_reviewed_at: None,
    }
  }

  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_review_at <= now
  }

  /// Reject states the scheduler cannot make guarantees about.
  ///
  /// Malformed states are never clamped: a state that fails here came from
  /// somewhere other than the scheduler and is surfaced to the caller.
  pub fn validate(&self) -> Result<(), ReviewStateError> {
    if self.box_level < 0 {
      return Err(ReviewStateError::NegativeBox(self.box_level));
    }
    if self.interval_days < 0 {
      return Err(ReviewStateError::NegativeInterval(self.interval_days));
    }
    if !self.ease_factor.is_finite() {
      return Err(ReviewStateError::NonFiniteEase);
    }
    if self.ease_factor < MIN_EASE_FACTOR {
      return Err(ReviewStateError::EaseBelowFloor(self.ease_factor));
    }
    Ok(())
  }
}

/// Review state errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewStateError {
  NegativeBox(i64),
  NegativeInterval(i64),
  EaseBelowFloor(f64),
  NonFiniteEase,
}

impl std::fmt::Display for ReviewStateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ReviewStateError::NegativeBox(b) => write!(f, "Malformed review state: box level {} is negative", b),
      ReviewStateError::NegativeInterval(d) => {
        write!(f, "Malformed review state: interval of {} days is negative", d)
      }
      ReviewStateError::EaseBelowFloor(ef) => {
        write!(f, "Malformed review state: ease factor {} is below {}", ef, MIN_EASE_FACTOR)
      }
      ReviewStateError::NonFiniteEase => write!(f, "Malformed review state: ease factor is not finite"),
    }
  }
}

impl ReviewStateError {
  /// Returns a user-facing error message without exposing stored values.
  pub fn user_message(&self) -> &'static str {
    "Card review data is corrupted"
  }
}

impl std::error::Error for ReviewStateError {}
