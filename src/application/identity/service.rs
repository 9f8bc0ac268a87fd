//! User management service
//!
//! Sign-up, sign-in and profile management. HTTP handlers are thin wrappers
//! that delegate here; every operation on another user's record goes through
//! the access policy first.

use std::sync::Arc;

use tracing::info;

use crate::application::access::{ensure, Action, AuthContext};
use crate::domain::user::USER_YEAR_RANGE;
use crate::domain::{
    Department, DenyReason, DomainError, DomainResult, NewUser, RepositoryProvider, RoleKind,
    User, UserChanges, UserQuery,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::PaginatedResult;

/// Returned after a successful sign-in
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
    pub department: Option<Department>,
}

#[derive(Debug, Clone, Default)]
pub struct SignupCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub year: Option<i32>,
    pub sin_number: Option<String>,
    pub department_id: Option<i32>,
    /// Role names; empty means `student`.
    pub roles: Vec<String>,
}

/// Credentials for the executive director created on first start.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone)]
pub struct IdentitySettings {
    pub jwt: JwtConfig,
    pub bcrypt_cost: u32,
    /// Lets sign-up request director roles.
    pub allow_privileged_signup: bool,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    settings: IdentitySettings,
}

/// Parses role names, keeping request order and dropping duplicates.
pub fn parse_roles(names: &[String]) -> DomainResult<Vec<RoleKind>> {
    let mut roles = Vec::with_capacity(names.len());
    for name in names {
        let role: RoleKind = name.parse()?;
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    Ok(roles)
}

fn check_year(year: Option<i32>) -> DomainResult<()> {
    match year {
        Some(y) if !USER_YEAR_RANGE.contains(&y) => Err(DomainError::Validation(format!(
            "Year must be between {} and {}",
            USER_YEAR_RANGE.start(),
            USER_YEAR_RANGE.end()
        ))),
        _ => Ok(()),
    }
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, settings: IdentitySettings) -> Self {
        Self { repos, settings }
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password(password, self.settings.bcrypt_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
    }

    async fn load(&self, id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    async fn check_department(&self, department_id: Option<i32>) -> DomainResult<()> {
        if let Some(id) = department_id {
            if self.repos.departments().find_by_id(id).await?.is_none() {
                return Err(DomainError::not_found("Department", "id", id));
            }
        }
        Ok(())
    }

    async fn check_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        sin_number: Option<&str>,
        except: Option<i32>,
    ) -> DomainResult<()> {
        let users = self.repos.users();
        let taken = |found: Option<User>| found.is_some_and(|u| Some(u.id) != except);

        if let Some(username) = username {
            if taken(users.find_by_username(username).await?) {
                return Err(DomainError::Conflict(format!(
                    "Username '{}' is already in use",
                    username
                )));
            }
        }
        if let Some(email) = email {
            if taken(users.find_by_email(email).await?) {
                return Err(DomainError::Conflict(format!(
                    "Email '{}' is already in use",
                    email
                )));
            }
        }
        if let Some(sin) = sin_number {
            if taken(users.find_by_sin_number(sin).await?) {
                return Err(DomainError::Conflict("SIN number is already in use".into()));
            }
        }
        Ok(())
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn signup(&self, command: SignupCommand) -> DomainResult<User> {
        check_year(command.year)?;

        let mut roles = parse_roles(&command.roles)?;
        if roles.is_empty() {
            roles.push(RoleKind::Student);
        }
        if !self.settings.allow_privileged_signup && roles.iter().any(|r| r.is_director()) {
            return Err(DomainError::forbidden(
                DenyReason::RoleMismatch,
                "Director roles cannot be requested at sign-up",
            ));
        }

        self.check_department(command.department_id).await?;
        self.check_unique(
            Some(&command.username),
            Some(&command.email),
            command.sin_number.as_deref(),
            None,
        )
        .await?;

        let user = self
            .repos
            .users()
            .create(NewUser {
                username: command.username,
                email: command.email,
                password_hash: self.hash(&command.password)?,
                full_name: command.full_name,
                year: command.year,
                sin_number: command.sin_number,
                department_id: command.department_id,
                primary_role: roles.first().copied(),
                roles,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    /// Input containing `@` is looked up as an email, anything else as a username.
    pub async fn signin(&self, login: &str, password: &str) -> DomainResult<AuthResult> {
        let users = self.repos.users();
        let found = if login.contains('@') {
            users.find_by_email(login).await?
        } else {
            users.find_by_username(login).await?
        };

        let Some(user) = found else {
            return Err(DomainError::Unauthenticated("Invalid credentials".into()));
        };
        if !user.is_active {
            return Err(DomainError::Unauthenticated("Account is disabled".into()));
        }
        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Unauthenticated("Invalid credentials".into()));
        }

        let token = create_token(user.id, &user.username, &self.settings.jwt)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        let department = match user.department_id {
            Some(id) => self.repos.departments().find_by_id(id).await?,
            None => None,
        };

        info!(user_id = user.id, "User signed in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.settings.jwt.expires_in_secs(),
            user,
            department,
        })
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn profile(&self, ctx: &AuthContext) -> DomainResult<User> {
        self.load(ctx.user_id).await
    }

    pub async fn get(&self, ctx: &AuthContext, id: i32) -> DomainResult<User> {
        ensure(ctx, Action::ReadUser { target: id })?;
        self.load(id).await
    }

    pub async fn list(&self, ctx: &AuthContext, query: UserQuery) -> DomainResult<PaginatedResult<User>> {
        ensure(ctx, Action::ListUsers)?;
        check_year(query.year)?;
        self.check_department(query.department_id).await?;
        self.repos.users().list(query).await
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn update(&self, ctx: &AuthContext, id: i32, changes: UserChanges) -> DomainResult<User> {
        ensure(ctx, Action::UpdateUser { target: id })?;
        if changes.is_active.is_some() && !ctx.is_director() {
            return Err(DomainError::forbidden(
                DenyReason::RoleMismatch,
                "Only directors can change account status",
            ));
        }
        check_year(changes.year)?;
        self.check_department(changes.department_id).await?;
        self.check_unique(
            changes.username.as_deref(),
            changes.email.as_deref(),
            changes.sin_number.as_deref(),
            Some(id),
        )
        .await?;

        let user = self.repos.users().update(id, changes).await?;
        info!(user_id = id, by = ctx.user_id, "User updated");
        Ok(user)
    }

    pub async fn change_password(
        &self,
        ctx: &AuthContext,
        id: i32,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        ensure(ctx, Action::ChangePassword { target: id })?;
        let user = self.load(id).await?;

        if !verify_password(current_password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Validation("Current password is incorrect".into()));
        }

        let new_hash = self.hash(new_password)?;
        self.repos.users().update_password(id, &new_hash).await?;

        info!(user_id = id, by = ctx.user_id, "Password changed");
        Ok(())
    }

    pub async fn reassign_roles(
        &self,
        ctx: &AuthContext,
        id: i32,
        role_names: &[String],
    ) -> DomainResult<User> {
        ensure(ctx, Action::ReassignRoles { target: id })?;
        let roles = parse_roles(role_names)?;
        if roles.is_empty() {
            return Err(DomainError::Validation("At least one role is required".into()));
        }
        self.load(id).await?;

        let user = self.repos.users().set_roles(id, roles).await?;
        info!(
            user_id = id,
            by = ctx.user_id,
            roles = ?user.authorities().rendered(),
            "Roles reassigned"
        );
        Ok(user)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: i32) -> DomainResult<()> {
        ensure(ctx, Action::DeleteUser { target: id })?;
        self.repos.users().delete(id).await?;
        info!(user_id = id, by = ctx.user_id, "User deleted");
        Ok(())
    }

    /// Creates the first executive director when no users exist yet.
    pub async fn bootstrap_admin(&self, admin: AdminBootstrap) -> DomainResult<Option<User>> {
        if self.repos.users().count().await? > 0 {
            return Ok(None);
        }

        let user = self
            .repos
            .users()
            .create(NewUser {
                username: admin.username,
                email: admin.email,
                password_hash: self.hash(&admin.password)?,
                full_name: admin.full_name,
                year: None,
                sin_number: None,
                department_id: None,
                primary_role: Some(RoleKind::ExecutiveDirector),
                roles: vec![RoleKind::ExecutiveDirector],
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "Bootstrap executive director created");
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn service(allow_privileged_signup: bool) -> UserService {
        UserService::new(
            Arc::new(InMemoryRepositoryProvider::new()),
            IdentitySettings {
                jwt: JwtConfig::new("secret", 1),
                bcrypt_cost: 4,
                allow_privileged_signup,
            },
        )
    }

    fn command(username: &str, roles: &[&str]) -> SignupCommand {
        SignupCommand {
            username: username.into(),
            email: format!("{}@example.edu", username),
            password: "password123".into(),
            full_name: "Test User".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        }
    }

    fn ctx_for(user: &User) -> AuthContext {
        AuthContext {
            user_id: user.id,
            authorities: user.authorities(),
            department_id: user.department_id,
            year: user.year,
        }
    }

    #[tokio::test]
    async fn signup_defaults_to_student() {
        let svc = service(false);
        let user = svc.signup(command("dana", &[])).await.unwrap();
        assert!(!user.authorities().is_empty());
        assert_eq!(user.authorities().rendered(), vec!["ROLE_STUDENT"]);
    }

    #[tokio::test]
    async fn signup_rejects_unknown_and_privileged_roles() {
        let svc = service(false);
        assert!(matches!(
            svc.signup(command("eve", &["wizard"])).await,
            Err(DomainError::Validation(_))
        ));
        let err = svc
            .signup(command("eve", &["executive_director"]))
            .await
            .unwrap_err();
        assert_eq!(err.deny_reason(), Some(DenyReason::RoleMismatch));
    }

    #[tokio::test]
    async fn signup_rejects_duplicates_and_bad_year() {
        let svc = service(false);
        svc.signup(command("fay", &[])).await.unwrap();
        assert!(matches!(
            svc.signup(command("fay", &[])).await,
            Err(DomainError::Conflict(_))
        ));

        let mut bad_year = command("gus", &[]);
        bad_year.year = Some(7);
        assert!(matches!(
            svc.signup(bad_year).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn signin_by_username_or_email() {
        let svc = service(false);
        svc.signup(command("hal", &[])).await.unwrap();

        let by_name = svc.signin("hal", "password123").await.unwrap();
        let by_email = svc.signin("hal@example.edu", "password123").await.unwrap();
        assert_eq!(by_name.user.id, by_email.user.id);
        assert_eq!(by_name.token_type, "Bearer");

        assert!(matches!(
            svc.signin("hal", "wrong").await,
            Err(DomainError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn students_cannot_read_others_but_directors_can() {
        let svc = service(true);
        let ivy = svc.signup(command("ivy", &[])).await.unwrap();
        let jon = svc.signup(command("jon", &[])).await.unwrap();
        let boss = svc.signup(command("boss", &["academic_director"])).await.unwrap();

        let err = svc.get(&ctx_for(&ivy), jon.id).await.unwrap_err();
        assert_eq!(err.deny_reason(), Some(DenyReason::SelfOnly));
        assert_eq!(svc.get(&ctx_for(&ivy), ivy.id).await.unwrap().id, ivy.id);
        assert_eq!(svc.get(&ctx_for(&boss), jon.id).await.unwrap().id, jon.id);
    }

    #[tokio::test]
    async fn only_executive_reassigns_roles() {
        let svc = service(true);
        let kim = svc.signup(command("kim", &[])).await.unwrap();
        let academic = svc.signup(command("aca", &["academic_director"])).await.unwrap();
        let exec = svc.signup(command("exe", &["executive_director"])).await.unwrap();
        let staff = vec!["staff".to_string()];

        let err = svc
            .reassign_roles(&ctx_for(&academic), kim.id, &staff)
            .await
            .unwrap_err();
        assert_eq!(err.deny_reason(), Some(DenyReason::RoleMismatch));

        let updated = svc.reassign_roles(&ctx_for(&exec), kim.id, &staff).await.unwrap();
        assert_eq!(updated.authorities().rendered(), vec!["ROLE_STAFF"]);

        assert!(matches!(
            svc.reassign_roles(&ctx_for(&exec), kim.id, &[]).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn change_password_checks_current() {
        let svc = service(false);
        let lea = svc.signup(command("lea", &[])).await.unwrap();
        let ctx = ctx_for(&lea);

        assert!(matches!(
            svc.change_password(&ctx, lea.id, "nope", "newpassword1").await,
            Err(DomainError::Validation(_))
        ));
        svc.change_password(&ctx, lea.id, "password123", "newpassword1")
            .await
            .unwrap();
        assert!(svc.signin("lea", "newpassword1").await.is_ok());
    }

    #[tokio::test]
    async fn bootstrap_runs_only_on_empty_store() {
        let svc = service(false);
        let admin = AdminBootstrap {
            username: "root".into(),
            email: "root@example.edu".into(),
            password: "rootpass".into(),
            full_name: "Root".into(),
        };
        let created = svc.bootstrap_admin(admin.clone()).await.unwrap().unwrap();
        assert!(created.authorities().is_executive());
        assert!(svc.bootstrap_admin(admin).await.unwrap().is_none());
    }
}
