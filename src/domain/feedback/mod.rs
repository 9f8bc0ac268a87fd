//! Feedback aggregate

pub mod model;
pub mod repository;

pub use model::{Feedback, FeedbackRevision, NewFeedback, Rating};
pub use repository::FeedbackRepository;
