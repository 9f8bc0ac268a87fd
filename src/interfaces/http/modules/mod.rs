pub mod auth;
pub mod departments;
pub mod feedback;
pub mod health;
pub mod metrics;
pub mod questions;
pub mod users;
