//! User domain entity

use chrono::{DateTime, Utc};

use crate::domain::role::{AuthoritySet, RoleKind};
use crate::shared::PaginationParams;

/// Years a user profile may carry.
pub const USER_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=6;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub year: Option<i32>,
    pub sin_number: Option<String>,
    pub is_active: bool,
    pub department_id: Option<i32>,
    pub primary_role: Option<RoleKind>,
    /// Assignments from the many-to-many relation.
    pub roles: Vec<RoleKind>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Authorities are recomputed from the stored roles on every call.
    pub fn authorities(&self) -> AuthoritySet {
        AuthoritySet::from_roles(self.primary_role, self.roles.iter().copied())
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub year: Option<i32>,
    pub sin_number: Option<String>,
    pub department_id: Option<i32>,
    pub primary_role: Option<RoleKind>,
    pub roles: Vec<RoleKind>,
}

/// Partial profile update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub year: Option<i32>,
    pub sin_number: Option<String>,
    pub department_id: Option<i32>,
    pub is_active: Option<bool>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_none()
            && self.year.is_none()
            && self.sin_number.is_none()
            && self.department_id.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub department_id: Option<i32>,
    pub year: Option<i32>,
    pub pagination: PaginationParams,
}
