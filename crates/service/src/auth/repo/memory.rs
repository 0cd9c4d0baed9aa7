//! In-memory repository for tests, doc examples and local demos.
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::domain::{AuthUser, Credentials, UserId};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

#[derive(Default)]
struct Tables {
    users: HashMap<String, AuthUser>,  // key: normalized email
    creds: HashMap<UserId, Credentials>,
    revoked: HashMap<String, DateTime<Utc>>,  // token id -> expiry
}

#[derive(Default)]
pub struct InMemoryAuthRepository {
    tables: Mutex<Tables>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AuthError> {
        self.tables
            .lock()
            .map_err(|_| AuthError::Repository("in-memory auth store poisoned".into()))
    }
}

#[async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let tables = self.lock()?;
        Ok(tables.users.get(&models::user::normalize_email(email)).cloned())
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<AuthUser>, AuthError> {
        let tables = self.lock()?;
        Ok(tables.users.values().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: String, password_algorithm: &str) -> Result<AuthUser, AuthError> {
        let key = models::user::normalize_email(email);
        let mut tables = self.lock()?;
        if tables.users.contains_key(&key) {
            return Err(AuthError::Conflict);
        }
        let user = AuthUser { id: UserId::new(), email: key.clone() };
        tables.users.insert(key, user.clone());
        tables.creds.insert(
            user.id,
            Credentials { user_id: user.id, password_hash, password_algorithm: password_algorithm.to_string() },
        );
        Ok(user)
    }

    async fn get_credentials(&self, user_id: UserId) -> Result<Option<Credentials>, AuthError> {
        let tables = self.lock()?;
        Ok(tables.creds.get(&user_id).cloned())
    }

    async fn revoke_token(&self, token_id: &str, _user_id: UserId, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        let mut tables = self.lock()?;
        let now = Utc::now();
        tables.revoked.retain(|_, exp| *exp >= now);
        tables.revoked.insert(token_id.to_string(), expires_at);
        Ok(())
    }

    async fn is_token_revoked(&self, token_id: &str) -> Result<bool, AuthError> {
        Ok(self.lock()?.revoked.contains_key(token_id))
    }
}
