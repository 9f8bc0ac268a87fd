//! User aggregate
//!
//! Contains the User entity, its change sets, and the repository interface.

pub mod model;
pub mod repository;

pub use model::{NewUser, User, UserChanges, UserQuery, USER_YEAR_RANGE};
pub use repository::UserRepository;
