//! Authentication API handlers

use axum::extract::State;

use super::dto::{SigninRequest, SigninResponse, SignupRequest};
use crate::application::AppServices;
use crate::interfaces::http::common::{created, ok, ApiReply, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::users::UserDto;

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation error or unknown role"),
        (status = 403, description = "Director roles cannot be self-assigned"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Username, email or SIN already taken")
    )
)]
pub async fn signup(
    State(services): State<AppServices>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiReply<UserDto> {
    let user = services.users.signup(request.into()).await?;
    Ok(created(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    tag = "Authentication",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SigninResponse>),
        (status = 401, description = "Invalid credentials or disabled account")
    )
)]
pub async fn signin(
    State(services): State<AppServices>,
    ValidatedJson(request): ValidatedJson<SigninRequest>,
) -> ApiReply<SigninResponse> {
    let result = services
        .users
        .signin(request.username.trim(), &request.password)
        .await?;
    Ok(ok(result.into()))
}
