//! In-process store implementing every collaborator trait.
//!
//! Useful for tests and for embedding the scheduler without a database.
//! Clones share the same underlying data.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{BacklogSource, CardStore, ScheduleStore, StoreError};
use crate::domain::{BacklogTopic, ReviewState, ScheduledTask};

#[derive(Debug, Clone)]
struct StoredTask {
    user_id: i64,
    task: ScheduledTask,
    completed: bool,
}

#[derive(Debug, Default)]
struct Inner {
    cards: HashMap<i64, ReviewState>,
    next_card_id: i64,
    /// Per-user topics in insertion order
    topics: HashMap<i64, Vec<BacklogTopic>>,
    tasks: Vec<StoredTask>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_: PoisonError<_>| {
            tracing::error!("Memory store mutex poisoned - a thread panicked while holding the lock");
            StoreError::Unavailable
        })
    }

    /// Create a card with a fresh review state, returning its id
    pub fn insert_card(&self, now: DateTime<Utc>) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        inner.next_card_id += 1;
        let id = inner.next_card_id;
        inner.cards.insert(id, ReviewState::new(now));
        Ok(id)
    }

    /// Ids and states of all cards, ordered by id
    pub fn review_states(&self) -> Result<Vec<(i64, ReviewState)>, StoreError> {
        let inner = self.lock()?;
        let mut states: Vec<(i64, ReviewState)> = inner.cards.iter().map(|(id, s)| (*id, s.clone())).collect();
        states.sort_by_key(|(id, _)| *id);
        Ok(states)
    }

    pub fn add_topic(&self, user_id: i64, topic: BacklogTopic) -> Result<(), StoreError> {
        self.lock()?.topics.entry(user_id).or_default().push(topic);
        Ok(())
    }

    /// Mark every stored task for this user/topic/date as completed
    pub fn mark_completed(&self, user_id: i64, topic_id: i64, date: NaiveDate) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let mut found = false;
        for stored in inner
            .tasks
            .iter_mut()
            .filter(|s| s.user_id == user_id && s.task.topic_id() == topic_id && s.task.date == date)
        {
            stored.completed = true;
            found = true;
        }
        if found {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!("task for topic {} on {}", topic_id, date)))
        }
    }

    /// The user's stored tasks ordered by date, with their completion flag
    pub fn tasks_for(&self, user_id: i64) -> Result<Vec<(ScheduledTask, bool)>, StoreError> {
        let inner = self.lock()?;
        let mut tasks: Vec<(ScheduledTask, bool)> = inner
            .tasks
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| (s.task.clone(), s.completed))
            .collect();
        tasks.sort_by_key(|(t, _)| t.date);
        Ok(tasks)
    }
}

impl CardStore for MemoryStore {
    fn load_review_state(&self, card_id: i64) -> Result<ReviewState, StoreError> {
        self.lock()?
            .cards
            .get(&card_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("card {}", card_id)))
    }

    fn save_review_state(&self, card_id: i64, state: &ReviewState) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        match inner.cards.get_mut(&card_id) {
            Some(existing) => {
                *existing = state.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("card {}", card_id))),
        }
    }
}

impl BacklogSource for MemoryStore {
    fn fetch_unscheduled_topics(&self, user_id: i64) -> Result<Vec<BacklogTopic>, StoreError> {
        let inner = self.lock()?;
        let topics = match inner.topics.get(&user_id) {
            Some(topics) => topics,
            None => return Ok(Vec::new()),
        };
        Ok(topics
            .iter()
            .filter(|topic| {
                !inner
                    .tasks
                    .iter()
                    .any(|s| s.user_id == user_id && s.task.topic_id() == topic.id)
            })
            .cloned()
            .collect())
    }
}

impl Inner {
    fn clear_uncompleted(&mut self, user_id: i64, dates: &RangeInclusive<NaiveDate>) -> usize {
        let before = self.tasks.len();
        self.tasks
            .retain(|s| s.user_id != user_id || s.completed || !dates.contains(&s.task.date));
        before - self.tasks.len()
    }

    fn insert(&mut self, user_id: i64, tasks: &[ScheduledTask]) {
        self.tasks.extend(tasks.iter().map(|task| StoredTask {
            user_id,
            task: task.clone(),
            completed: false,
        }));
    }
}

impl ScheduleStore for MemoryStore {
    fn clear_uncompleted_tasks(&self, user_id: i64, dates: RangeInclusive<NaiveDate>) -> Result<usize, StoreError> {
        Ok(self.lock()?.clear_uncompleted(user_id, &dates))
    }

    fn insert_tasks(&self, user_id: i64, tasks: &[ScheduledTask]) -> Result<(), StoreError> {
        self.lock()?.insert(user_id, tasks);
        Ok(())
    }

    fn uncompleted_tasks(&self, user_id: i64, dates: RangeInclusive<NaiveDate>) -> Result<Vec<ScheduledTask>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .tasks
            .iter()
            .filter(|s| s.user_id == user_id && !s.completed && dates.contains(&s.task.date))
            .map(|s| s.task.clone())
            .collect())
    }

    fn replace_uncompleted_tasks(
        &self,
        user_id: i64,
        dates: RangeInclusive<NaiveDate>,
        tasks: &[ScheduledTask],
    ) -> Result<usize, StoreError> {
        // One guard for both steps
        let mut inner = self.lock()?;
        let cleared = inner.clear_uncompleted(user_id, &dates);
        inner.insert(user_id, tasks);
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn test_card_round_trip() {
        let store = MemoryStore::new();
        let id = store.insert_card(now()).unwrap();
        assert_eq!(store.load_review_state(id).unwrap(), ReviewState::new(now()));

        let mut state = ReviewState::new(now());
        state.box_level = 3;
        store.save_review_state(id, &state).unwrap();
        assert_eq!(store.load_review_state(id).unwrap().box_level, 3);
    }

    #[test]
    fn test_card_ids_are_sequential() {
        let store = MemoryStore::new();
        assert_eq!(store.insert_card(now()).unwrap(), 1);
        assert_eq!(store.insert_card(now()).unwrap(), 2);
        assert_eq!(store.review_states().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_card() {
        let store = MemoryStore::new();
        assert!(matches!(store.load_review_state(42), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.save_review_state(42, &ReviewState::new(now())),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_backlog_excludes_scheduled_topics() {
        let store = MemoryStore::new();
        for id in 1..=3 {
            store.add_topic(1, BacklogTopic::new(id, None)).unwrap();
        }
        store.add_topic(2, BacklogTopic::new(99, None)).unwrap();

        store
            .insert_tasks(1, &[ScheduledTask::new(BacklogTopic::new(2, None), date(10))])
            .unwrap();

        let ids: Vec<i64> = store.fetch_unscheduled_topics(1).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.fetch_unscheduled_topics(2).unwrap().len(), 1);
        assert!(store.fetch_unscheduled_topics(3).unwrap().is_empty());
    }

    #[test]
    fn test_clear_keeps_completed_and_out_of_range() {
        let store = MemoryStore::new();
        let task = |id, day| ScheduledTask::new(BacklogTopic::new(id, None), date(day));
        store
            .insert_tasks(1, &[task(1, 10), task(2, 11), task(3, 20), task(4, 12)])
            .unwrap();
        store.insert_tasks(2, &[task(5, 10)]).unwrap();
        store.mark_completed(1, 4, date(12)).unwrap();

        let removed = store.clear_uncompleted_tasks(1, date(10)..=date(16)).unwrap();
        assert_eq!(removed, 2);

        let remaining: Vec<(i64, bool)> = store
            .tasks_for(1)
            .unwrap()
            .iter()
            .map(|(t, done)| (t.topic_id(), *done))
            .collect();
        assert_eq!(remaining, vec![(4, true), (3, false)]);
        assert_eq!(store.tasks_for(2).unwrap().len(), 1);
    }

    #[test]
    fn test_uncompleted_tasks_in_window() {
        let store = MemoryStore::new();
        let task = |id, day| ScheduledTask::new(BacklogTopic::new(id, None), date(day));
        store
            .insert_tasks(1, &[task(1, 10), task(2, 11), task(3, 20), task(4, 12)])
            .unwrap();
        store.mark_completed(1, 2, date(11)).unwrap();

        let ids: Vec<i64> = store
            .uncompleted_tasks(1, date(10)..=date(16))
            .unwrap()
            .iter()
            .map(|t| t.topic_id())
            .collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_replace_uncompleted_tasks() {
        let store = MemoryStore::new();
        let task = |id, day| ScheduledTask::new(BacklogTopic::new(id, None), date(day));
        store.insert_tasks(1, &[task(1, 10), task(2, 11), task(3, 20)]).unwrap();
        store.mark_completed(1, 2, date(11)).unwrap();

        let cleared = store
            .replace_uncompleted_tasks(1, date(10)..=date(16), &[task(1, 12), task(5, 13)])
            .unwrap();
        assert_eq!(cleared, 1);

        let remaining: Vec<(i64, bool)> = store
            .tasks_for(1)
            .unwrap()
            .iter()
            .map(|(t, done)| (t.topic_id(), *done))
            .collect();
        assert_eq!(remaining, vec![(2, true), (1, false), (5, false), (3, false)]);
    }

    #[test]
    fn test_mark_completed_missing_task() {
        let store = MemoryStore::new();
        assert!(matches!(store.mark_completed(1, 1, date(10)), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_clones_share_data() {
        let store = MemoryStore::new();
        let other = store.clone();
        let id = store.insert_card(now()).unwrap();
        assert!(other.load_review_state(id).is_ok());
    }
}
