use std::sync::Arc;

use async_trait::async_trait;
use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput, UserId};
use super::errors::AuthError;
use super::provider::{AuthProvider, JwtAuthProvider, RequestContext, SessionClaims};
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub password_algorithm: String,
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { password_algorithm: "argon2".into(), min_password_length: 8 }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    tokens: Arc<JwtAuthProvider>,
    cfg: AuthConfig,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: Arc<JwtAuthProvider>, cfg: AuthConfig) -> Self {
        Self { repo, tokens, cfg }
    }

    pub fn tokens(&self) -> &Arc<JwtAuthProvider> {
        &self.tokens
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repo::memory::InMemoryAuthRepository, JwtAuthProvider};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryAuthRepository::new());
    /// let tokens = Arc::new(JwtAuthProvider::new("secret", chrono::Duration::hours(1)));
    /// let svc = AuthService::new(repo, tokens, AuthConfig::default());
    /// let input = RegisterInput { email: "user@example.com".into(), password: "Secret123".into(), password_confirmation: None };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        models::user::validate_email(&input.email).map_err(|e| match e {
            models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
            other => AuthError::Repository(other.to_string()),
        })?;
        if input.password.chars().count() < self.cfg.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password is too short (minimum is {} characters)",
                self.cfg.min_password_length
            )));
        }
        if let Some(confirmation) = &input.password_confirmation {
            if confirmation != &input.password {
                return Err(AuthError::Validation("Password confirmation doesn't match Password".into()));
            }
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let user = self.repo.create_user(&input.email, hash, &self.cfg.password_algorithm).await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repo::memory::InMemoryAuthRepository, JwtAuthProvider};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryAuthRepository::new());
    /// let tokens = Arc::new(JwtAuthProvider::new("secret", chrono::Duration::hours(1)));
    /// let svc = AuthService::new(repo, tokens, AuthConfig::default());
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), password: "Passw0rd".into(), password_confirmation: None }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            warn!(user_id = %user.id, "login_rejected");
            return Err(AuthError::Unauthorized);
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "user_signed_in");
        Ok(AuthSession { user, token })
    }

    /// Look up the account behind a resolved session.
    pub async fn find_user(&self, id: UserId) -> Result<AuthUser, AuthError> {
        self.repo.find_user_by_id(id).await?.ok_or(AuthError::NotFound)
    }

    /// Resolve the request's token: valid signature, not expired, not signed out.
    pub async fn authenticate(&self, ctx: &RequestContext) -> Result<SessionClaims, AuthError> {
        let token = ctx.token().ok_or(AuthError::Unauthorized)?;
        let claims = self.tokens.verify(token)?;
        if self.repo.is_token_revoked(&claims.token_id).await? {
            return Err(AuthError::TokenError("token has been signed out".into()));
        }
        Ok(claims)
    }

    /// Revoke the request's token. Fails with `NotFound` when the request
    /// carries no live session.
    #[instrument(skip(self, ctx))]
    pub async fn sign_out(&self, ctx: &RequestContext) -> Result<AuthUser, AuthError> {
        let claims = match self.authenticate(ctx).await {
            Ok(claims) => claims,
            Err(AuthError::Repository(e)) => return Err(AuthError::Repository(e)),
            Err(_) => return Err(AuthError::NotFound),
        };
        let user = self.find_user(claims.user_id).await?;
        self.repo.revoke_token(&claims.token_id, claims.user_id, claims.expires_at).await?;
        info!(user_id = %user.id, "user_signed_out");
        Ok(user)
    }
}

#[async_trait]
impl<R: AuthRepository + ?Sized> AuthProvider for AuthService<R> {
    async fn current_user(&self, ctx: &RequestContext) -> Option<UserId> {
        match self.authenticate(ctx).await {
            Ok(claims) => Some(claims.user_id),
            Err(AuthError::Repository(e)) => {
                warn!(err = %e, "session lookup failed");
                None
            }
            Err(e) => {
                debug!(err = %e, "rejected session token");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::memory::InMemoryAuthRepository;

    fn service() -> AuthService<InMemoryAuthRepository> {
        let tokens = Arc::new(JwtAuthProvider::new("test-secret", chrono::Duration::hours(1)));
        AuthService::new(Arc::new(InMemoryAuthRepository::new()), tokens, AuthConfig::default())
    }

    fn register_input(email: &str, password: &str) -> RegisterInput {
        RegisterInput { email: email.into(), password: password.into(), password_confirmation: None }
    }

    #[tokio::test]
    async fn register_then_login_issues_usable_token() {
        let svc = service();
        let user = svc.register(register_input("Driver@Example.com", "S3curePass!")).await.unwrap();
        assert_eq!(user.email, "driver@example.com");

        let session = svc
            .login(LoginInput { email: "driver@example.com".into(), password: "S3curePass!".into() })
            .await
            .unwrap();
        assert_eq!(session.user.id, user.id);
        let ctx = RequestContext::new().with_session(session.token);
        assert_eq!(svc.current_user(&ctx).await, Some(user.id));
        assert_eq!(svc.find_user(user.id).await.unwrap().email, "driver@example.com");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = service();
        svc.register(register_input("a@b.com", "StrongPass123")).await.unwrap();
        let err = svc
            .login(LoginInput { email: "a@b.com".into(), password: "wrong".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        assert_eq!(err.to_string(), "Invalid Email or password.");
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let err = service()
            .login(LoginInput { email: "nobody@b.com".into(), password: "whatever1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = service();
        svc.register(register_input("a@b.com", "StrongPass123")).await.unwrap();
        let err = svc.register(register_input("A@B.com", "StrongPass123")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn short_password_and_bad_confirmation_rejected() {
        let svc = service();
        let err = svc.register(register_input("a@b.com", "short")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let mut input = register_input("a@b.com", "LongEnough1");
        input.password_confirmation = Some("Different1".into());
        let err = svc.register(input).await.unwrap_err();
        assert_eq!(err.to_string(), "Password confirmation doesn't match Password");
    }

    #[tokio::test]
    async fn signed_out_token_is_rejected() {
        let svc = service();
        svc.register(register_input("a@b.com", "StrongPass123")).await.unwrap();
        let login = LoginInput { email: "a@b.com".into(), password: "StrongPass123".into() };
        let first = svc.login(login.clone()).await.unwrap();
        let second = svc.login(login).await.unwrap();

        let ctx = RequestContext::new().with_bearer(first.token);
        assert_eq!(svc.sign_out(&ctx).await.unwrap().email, "a@b.com");
        assert_eq!(svc.current_user(&ctx).await, None);
        assert!(matches!(svc.sign_out(&ctx).await, Err(AuthError::NotFound)));

        // other sessions of the same user stay valid
        let other = RequestContext::new().with_session(second.token);
        assert_eq!(svc.current_user(&other).await, Some(first.user.id));
    }

    #[tokio::test]
    async fn sign_out_without_token_is_not_found() {
        let err = service().sign_out(&RequestContext::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn invalid_email_rejected() {
        let err = service().register(register_input("not-an-email", "LongEnough1")).await.unwrap_err();
        assert_eq!(err.to_string(), "Email is invalid");
    }
}
