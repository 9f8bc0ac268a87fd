//! Database entities module

pub mod department;
pub mod enums;
pub mod feedback;
pub mod question;
pub mod role;
pub mod user;
pub mod user_role;

pub use department::Entity as Department;
pub use feedback::Entity as Feedback;
pub use question::Entity as Question;
pub use role::Entity as Role;
pub use user::Entity as User;
pub use user_role::Entity as UserRole;
