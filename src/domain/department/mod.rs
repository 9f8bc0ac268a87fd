//! Department aggregate

pub mod model;
pub mod repository;

pub use model::{Department, DepartmentChanges, NewDepartment};
pub use repository::DepartmentRepository;
