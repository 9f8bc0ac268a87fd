//! Departments and questions

pub mod departments;
pub mod questions;

pub use departments::{CreateDepartment, DepartmentService, UpdateDepartment};
pub use questions::{CreateQuestion, QuestionService, UpdateQuestion};
