use chrono::{DateTime, Duration, Utc};

use crate::config::{FIRST_INTERVAL_DAYS, MAX_INTERVAL_DAYS, MIN_EASE_FACTOR, SECOND_INTERVAL_DAYS};
use crate::domain::{ReviewRating, ReviewState};

/// Compute a card's next state after a review (SM-2).
///
/// "again" sends the card back to box 1 with a one-day interval but keeps
/// its ease factor, which is only nudged down. Remembered cards step
/// through 1 day, 6 days, then `interval * ease`. Every rating adjusts the
/// ease factor, which never drops below 1.3.
///
/// The input is expected to satisfy `ReviewState::validate`. `now` is
/// injected so the function stays pure. Never panics: the box counter
/// saturates and a due date past the calendar end is pinned to it.
pub fn compute_next_review(state: &ReviewState, rating: ReviewRating, now: DateTime<Utc>) -> ReviewState {
  let q = f64::from(rating.quality());

  let (box_level, interval_days) = if !rating.is_recalled() {
    // Forgotten: relearn from scratch
    (1, FIRST_INTERVAL_DAYS)
  } else {
    let interval = match state.box_level {
      0 => FIRST_INTERVAL_DAYS,
      1 => SECOND_INTERVAL_DAYS,
      // Grows with the ease factor the card had going into this review
      _ => ((state.interval_days as f64) * state.ease_factor).round() as i64,
    };
    (state.box_level.saturating_add(1), interval.clamp(FIRST_INTERVAL_DAYS, MAX_INTERVAL_DAYS))
  };

  // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
  let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
  let ease_factor = (state.ease_factor + ease_delta).max(MIN_EASE_FACTOR);

  ReviewState {
    box_level,
    interval_days,
    ease_factor,
    // Saturates at the last representable instant instead of overflowing
    next_review_at: now
      .checked_add_signed(Duration::days(interval_days))
      .unwrap_or(DateTime::<Utc>::MAX_UTC),
    last_reviewed_at: Some(now),
  }
}
