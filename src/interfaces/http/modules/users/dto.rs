//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::Related;
use crate::domain::{User, UserChanges, UserQuery};
use crate::interfaces::http::modules::departments::DepartmentSummary;
use crate::shared::PaginationParams;

/// User API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sin_number: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentSummary>,
    /// Role names, primary role first
    pub roles: Vec<String>,
    /// Authority strings, e.g. `ROLE_STUDENT`
    pub authorities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        let authorities = u.authorities().rendered();
        let mut roles: Vec<String> = Vec::with_capacity(u.roles.len() + 1);
        for role in u.primary_role.into_iter().chain(u.roles.iter().copied()) {
            let name = role.as_str().to_string();
            if !roles.contains(&name) {
                roles.push(name);
            }
        }
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            year: u.year,
            sin_number: u.sin_number,
            is_active: u.is_active,
            department_id: u.department_id,
            department: None,
            roles,
            authorities,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl UserDto {
    pub fn with_related(user: User, related: &Related) -> Self {
        let department = related.department(user.department_id).map(DepartmentSummary::from);
        Self {
            department,
            ..Self::from(user)
        }
    }
}

/// Submitter reference embedded in feedback responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentSummary>,
}

impl UserSummary {
    pub fn with_related(user: &User, related: &Related) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            year: user.year,
            department_id: user.department_id,
            department: related.department(user.department_id).map(DepartmentSummary::from),
        }
    }
}

/// Update user request; absent fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100, message = "full name must be 1-100 characters"))]
    pub full_name: Option<String>,
    pub year: Option<i32>,
    pub sin_number: Option<String>,
    pub department_id: Option<i32>,
    /// Directors only
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            full_name: r.full_name,
            year: r.year,
            sin_number: r.sin_number,
            department_id: r.department_id,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, max = 128, message = "new password must be 6-128 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReassignRolesRequest {
    /// Role names, e.g. `["staff", "academic_director"]`; the first becomes primary
    #[validate(length(min = 1, message = "at least one role is required"))]
    pub roles: Vec<String>,
}

/// List users query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    pub department_id: Option<i32>,
    /// Year of study, 1-6
    pub year: Option<i32>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}
fn default_limit() -> u32 {
    20
}

impl From<ListUsersParams> for UserQuery {
    fn from(p: ListUsersParams) -> Self {
        Self {
            department_id: p.department_id,
            year: p.year,
            pagination: PaginationParams::normalized(p.page, p.limit),
        }
    }
}
