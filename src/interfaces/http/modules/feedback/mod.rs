//! Feedback module: submission, history and statistics

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
