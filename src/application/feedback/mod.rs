//! Feedback submission, reconciliation and statistics

pub mod aggregator;
pub mod reconciler;
pub mod service;

pub use aggregator::{aggregate, DepartmentStats, GlobalStats, QuestionStats, RatingStats};
pub use reconciler::{Submission, SubmitOutcome};
pub use service::{FeedbackService, QuestionFeedback, SubmitFeedback};
