pub mod department;
pub mod feedback;
pub mod lifecycle;
pub mod question;
pub mod repositories;
pub mod role;
pub mod user;

// Re-export commonly used types
pub use department::{Department, DepartmentChanges, NewDepartment};
pub use feedback::{Feedback, FeedbackRevision, NewFeedback, Rating};
pub use lifecycle::LifecycleState;
pub use question::{NewQuestion, Question, QuestionChanges, QuestionFilter, RoleTarget};
pub use repositories::RepositoryProvider;
pub use role::{AuthoritySet, RoleKind};
pub use user::{NewUser, User, UserChanges, UserQuery};

pub use crate::shared::{DenyReason, DomainError, DomainResult};
