//! User module: profile, listing, updates, password and role changes

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
