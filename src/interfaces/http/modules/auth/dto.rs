//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::identity::{AuthResult, SignupCommand};
use crate::interfaces::http::modules::departments::DepartmentSummary;
use crate::interfaces::http::modules::users::UserDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SigninRequest {
    /// Username, or email when it contains `@`
    #[serde(alias = "email", alias = "login")]
    #[validate(length(min = 1, max = 100, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SigninResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserDto,
    pub authorities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentSummary>,
}

impl From<AuthResult> for SigninResponse {
    fn from(r: AuthResult) -> Self {
        Self {
            authorities: r.user.authorities().rendered(),
            token: r.token,
            token_type: r.token_type,
            expires_in: r.expires_in,
            user: UserDto {
                department: r.department.as_ref().map(DepartmentSummary::from),
                ..UserDto::from(r.user)
            },
            department: r.department.map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6-128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "full name must be 1-100 characters"))]
    pub full_name: String,
    /// Year of study, 1-6
    pub year: Option<i32>,
    pub sin_number: Option<String>,
    pub department_id: Option<i32>,
    /// Role names; defaults to `["student"]`
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<SignupRequest> for SignupCommand {
    fn from(r: SignupRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            password: r.password,
            full_name: r.full_name,
            year: r.year,
            sin_number: r.sin_number,
            department_id: r.department_id,
            roles: r.roles,
        }
    }
}
