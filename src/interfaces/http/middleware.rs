//! Authentication middleware for Axum
//!
//! Resolves the caller from `Authorization: Bearer <jwt>` (or the legacy
//! `x-access-token` header) and stores an [`AuthContext`] in the request
//! extensions for handlers to pick up with `Extension<AuthContext>`.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::common::ApiError;
use crate::application::{AuthContext, IdentityResolver};

pub const LEGACY_TOKEN_HEADER: &str = "x-access-token";

#[derive(Clone)]
pub struct AuthState {
    pub resolver: IdentityResolver,
}

/// `<scheme> <credentials>` with the scheme matched case-insensitively.
fn bearer_credentials(value: &str) -> Option<&str> {
    let (scheme, credentials) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(credentials)
}

/// Bearer token first, then the legacy header.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_credentials);
    let legacy = || {
        headers
            .get(LEGACY_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
    };
    bearer.or_else(legacy).map(|t| t.trim().to_string())
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = extract_token(request.headers());

    match state.resolver.resolve(token.as_deref()).await {
        Ok(ctx) => {
            debug!(user_id = ctx.user_id, authorities = ?ctx.authorities.rendered(), "Caller resolved");
            request.extensions_mut().insert::<AuthContext>(ctx);
            next.run(request).await
        }
        Err(e) => ApiError(e).into_response(),
    }
}
