//! Application services.
//!
//! Services wire the pure scheduling functions to injected storage. They
//! are the only place where review and plan operations touch persistence.

pub mod plan;
pub mod review;

pub use plan::PlanService;
pub use review::ReviewService;

use crate::domain::{RatingParseError, ReviewStateError};
use crate::planner::PlanError;
use crate::store::StoreError;

/// Errors surfaced by the services.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    InvalidRating(RatingParseError),
    MalformedReviewState(i64, ReviewStateError),
    Plan(PlanError),
    Store(StoreError),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::InvalidRating(e) => write!(f, "{}", e),
            ServiceError::MalformedReviewState(card_id, e) => write!(f, "Card {}: {}", card_id, e),
            ServiceError::Plan(e) => write!(f, "{}", e),
            ServiceError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl ServiceError {
    /// Returns a user-facing error message without exposing internals.
    pub fn user_message(&self) -> &'static str {
        match self {
            ServiceError::InvalidRating(e) => e.user_message(),
            ServiceError::MalformedReviewState(_, e) => e.user_message(),
            ServiceError::Plan(e) => e.user_message(),
            ServiceError::Store(e) => e.user_message(),
        }
    }

    /// True for errors caused by the caller's input rather than storage
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::InvalidRating(_) | ServiceError::Plan(_))
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::InvalidRating(e) => Some(e),
            ServiceError::MalformedReviewState(_, e) => Some(e),
            ServiceError::Plan(e) => Some(e),
            ServiceError::Store(e) => Some(e),
        }
    }
}

impl From<RatingParseError> for ServiceError {
    fn from(e: RatingParseError) -> Self {
        ServiceError::InvalidRating(e)
    }
}

impl From<PlanError> for ServiceError {
    fn from(e: PlanError) -> Self {
        ServiceError::Plan(e)
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}
