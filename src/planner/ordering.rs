//! Backlog ordering applied by callers before distribution.
//!
//! The distributor takes topics in the order given. Anything smarter than
//! query order (grouping by subject, shortest first) is done here, with a
//! stable sort so equal topics keep their original relative order.

use std::cmp::Ordering;

use crate::domain::BacklogTopic;

/// Stable-sort the backlog with a caller-supplied comparator
pub fn sort_backlog<F>(backlog: &mut [BacklogTopic], cmp: F)
where
  F: FnMut(&BacklogTopic, &BacklogTopic) -> Ordering,
{
  backlog.sort_by(cmp);
}

/// Group by subject, then chapter; topics without a subject go last
pub fn by_subject(a: &BacklogTopic, b: &BacklogTopic) -> Ordering {
  fn key(t: &BacklogTopic) -> (bool, Option<&str>, bool, Option<&str>) {
    (
      t.subject.is_none(),
      t.subject.as_deref(),
      t.chapter.is_none(),
      t.chapter.as_deref(),
    )
  }
  key(a).cmp(&key(b))
}

/// Shortest estimated topics first, using `default_minutes` for unestimated ones
pub fn shortest_first(default_minutes: u32) -> impl FnMut(&BacklogTopic, &BacklogTopic) -> Ordering {
  move |a, b| a.minutes_or(default_minutes).cmp(&b.minutes_or(default_minutes))
}
