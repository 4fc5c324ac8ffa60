//! Review recording: load a card's state, schedule it, persist the result.

use chrono::{DateTime, Utc};

use super::ServiceError;
use crate::domain::{ReviewRating, ReviewState};
use crate::srs::compute_next_review;
use crate::store::CardStore;

/// Applies ratings to stored cards
pub struct ReviewService<S> {
    store: S,
}

impl<S: CardStore> ReviewService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Schedule `card_id` after a review rated `rating` at `now`.
    ///
    /// A stored state that fails validation is rejected and left untouched.
    pub fn record_review(
        &self,
        card_id: i64,
        rating: ReviewRating,
        now: DateTime<Utc>,
    ) -> Result<ReviewState, ServiceError> {
        let current = self.store.load_review_state(card_id)?;
        current.validate().map_err(|e| {
            tracing::warn!("Refusing to schedule card {}: {}", card_id, e);
            ServiceError::MalformedReviewState(card_id, e)
        })?;

        let next = compute_next_review(&current, rating, now);
        self.store.save_review_state(card_id, &next)?;

        tracing::debug!(
            "Card {} rated {}: box {} -> {}, interval {}d, ease {:.2}",
            card_id,
            rating,
            current.box_level,
            next.box_level,
            next.interval_days,
            next.ease_factor
        );
        Ok(next)
    }

    /// Same as `record_review`, for a rating still in its raw string form
    pub fn record_review_str(&self, card_id: i64, rating: &str, now: DateTime<Utc>) -> Result<ReviewState, ServiceError> {
        let rating: ReviewRating = rating.parse()?;
        self.record_review(card_id, rating, now)
    }
}
