//! Due-card selection over in-memory review states.
//!
//! A card is due once `now` has reached its `next_review_at`. Due cards are
//! served oldest-due first so long-overdue cards are not starved by fresh
//! ones.

use chrono::{DateTime, Utc};

use crate::domain::ReviewState;

/// Ids of cards due at `now`, most overdue first, at most `limit` of them
pub fn due_cards<'a, I>(cards: I, now: DateTime<Utc>, limit: usize) -> Vec<i64>
where
  I: IntoIterator<Item = (i64, &'a ReviewState)>,
{
  let mut due: Vec<(DateTime<Utc>, i64)> = cards
    .into_iter()
    .filter(|(_, state)| state.is_due(now))
    .map(|(id, state)| (state.next_review_at, id))
    .collect();

  due.sort_unstable();
  due.into_iter().take(limit).map(|(_, id)| id).collect()
}

/// Count of cards due at `now`
pub fn due_count<'a, I>(cards: I, now: DateTime<Utc>) -> usize
where
  I: IntoIterator<Item = (i64, &'a ReviewState)>,
{
  cards.into_iter().filter(|(_, state)| state.is_due(now)).count()
}

/// Earliest upcoming review among cards not yet due
pub fn next_due_at<'a, I>(cards: I, now: DateTime<Utc>) -> Option<DateTime<Utc>>
where
  I: IntoIterator<Item = (i64, &'a ReviewState)>,
{
  cards
    .into_iter()
    .map(|(_, state)| state.next_review_at)
    .filter(|at| *at > now)
    .min()
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
  }

  fn due_in(hours: i64) -> ReviewState {
    let mut state = ReviewState::new(now());
    state.next_review_at = now() + Duration::hours(hours);
    state
  }

  #[test]
  fn test_due_cards_ordered_by_due_time() {
    let cards = vec![(1, due_in(-1)), (2, due_in(5)), (3, due_in(-48)), (4, due_in(0)), (5, due_in(-3))];
    let ids = due_cards(cards.iter().map(|(id, s)| (*id, s)), now(), 10);
    assert_eq!(ids, vec![3, 5, 1, 4]);
  }

  #[test]
  fn test_due_cards_limit() {
    let cards = vec![(1, due_in(-1)), (2, due_in(-2)), (3, due_in(-3))];
    let ids = due_cards(cards.iter().map(|(id, s)| (*id, s)), now(), 2);
    assert_eq!(ids, vec![3, 2]);
  }

  #[test]
  fn test_due_cards_ties_by_id() {
    let cards = vec![(9, due_in(-1)), (2, due_in(-1))];
    let ids = due_cards(cards.iter().map(|(id, s)| (*id, s)), now(), 10);
    assert_eq!(ids, vec![2, 9]);
  }

  #[test]
  fn test_due_count() {
    let cards = vec![(1, due_in(-1)), (2, due_in(1)), (3, due_in(0))];
    assert_eq!(due_count(cards.iter().map(|(id, s)| (*id, s)), now()), 2);
  }

  #[test]
  fn test_next_due_at() {
    let cards = vec![(1, due_in(-1)), (2, due_in(7)), (3, due_in(2))];
    assert_eq!(
      next_due_at(cards.iter().map(|(id, s)| (*id, s)), now()),
      Some(now() + Duration::hours(2))
    );
  }

  #[test]
  fn test_next_due_at_none_when_everything_due() {
    let cards = vec![(1, due_in(-1)), (2, due_in(0))];
    assert_eq!(next_due_at(cards.iter().map(|(id, s)| (*id, s)), now()), None);
    assert_eq!(due_cards(std::iter::empty(), now(), 5), Vec::<i64>::new());
  }
}
