pub mod due;
pub mod sm2;

pub use due::{due_cards, due_count, next_due_at};
pub use sm2::compute_next_review;
