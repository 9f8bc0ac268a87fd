//! Question aggregate

pub mod model;
pub mod repository;

pub use model::{
    NewQuestion, Question, QuestionChanges, QuestionFilter, RoleTarget, QUESTION_YEAR_RANGE,
};
pub use repository::QuestionRepository;
