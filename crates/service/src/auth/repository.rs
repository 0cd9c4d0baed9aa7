use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{AuthUser, Credentials, UserId};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<AuthUser>, AuthError>;

    /// Create the user row and its credentials together.
    async fn create_user(&self, email: &str, password_hash: String, password_algorithm: &str) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: UserId) -> Result<Option<Credentials>, AuthError>;

    /// Remember a signed-out token id until the token would have expired.
    async fn revoke_token(&self, token_id: &str, user_id: UserId, expires_at: DateTime<Utc>) -> Result<(), AuthError>;
    async fn is_token_revoked(&self, token_id: &str) -> Result<bool, AuthError>;
}
