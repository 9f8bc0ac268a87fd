//! Token → caller resolution
//!
//! Authorities are rebuilt from storage on every call so role changes take
//! effect on the caller's next request.

use std::sync::Arc;

use tracing::debug;

use crate::application::access::AuthContext;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};

#[derive(Clone)]
pub struct IdentityResolver {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl IdentityResolver {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    pub async fn resolve(&self, token: Option<&str>) -> DomainResult<AuthContext> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::Unauthenticated("No token provided".into()))?;

        let claims = verify_token(token, &self.jwt_config).map_err(|e| {
            debug!(error = %e, "Token verification failed");
            DomainError::Unauthenticated("Invalid or expired token".into())
        })?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| DomainError::Unauthenticated("Malformed token subject".into()))?;

        let user = self
            .repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        if !user.is_active {
            return Err(DomainError::Unauthenticated("Account is disabled".into()));
        }

        Ok(AuthContext {
            user_id: user.id,
            authorities: user.authorities(),
            department_id: user.department_id,
            year: user.year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewUser, RoleKind, UserChanges};
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    async fn setup() -> (IdentityResolver, Arc<dyn RepositoryProvider>, i32) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let user = repos
            .users()
            .create(NewUser {
                username: "carol".into(),
                email: "carol@example.edu".into(),
                password_hash: "x".into(),
                full_name: "Carol".into(),
                year: Some(2),
                sin_number: None,
                department_id: Some(1),
                primary_role: Some(RoleKind::Staff),
                roles: vec![RoleKind::Student],
            })
            .await
            .unwrap();
        let resolver = IdentityResolver::new(repos.clone(), JwtConfig::new("secret", 1));
        (resolver, repos, user.id)
    }

    #[tokio::test]
    async fn resolves_union_of_primary_and_assigned_roles() {
        let (resolver, _, id) = setup().await;
        let token = create_token(id, "carol", &JwtConfig::new("secret", 1)).unwrap();

        let ctx = resolver.resolve(Some(&token)).await.unwrap();
        assert_eq!(ctx.user_id, id);
        assert_eq!(ctx.authorities.rendered(), vec!["ROLE_STUDENT", "ROLE_STAFF"]);
        assert_eq!(ctx.department_id, Some(1));
    }

    #[tokio::test]
    async fn missing_or_bad_token_is_unauthenticated() {
        let (resolver, _, _) = setup().await;
        assert!(matches!(
            resolver.resolve(None).await,
            Err(DomainError::Unauthenticated(_))
        ));
        assert!(matches!(
            resolver.resolve(Some("garbage")).await,
            Err(DomainError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (resolver, _, _) = setup().await;
        let token = create_token(999, "ghost", &JwtConfig::new("secret", 1)).unwrap();
        assert!(matches!(
            resolver.resolve(Some(&token)).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn disabled_user_is_unauthenticated() {
        let (resolver, repos, id) = setup().await;
        repos
            .users()
            .update(
                id,
                UserChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let token = create_token(id, "carol", &JwtConfig::new("secret", 1)).unwrap();
        assert!(matches!(
            resolver.resolve(Some(&token)).await,
            Err(DomainError::Unauthenticated(_))
        ));
    }
}
