use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};

use crate::auth::domain::{AuthUser, Credentials, UserId};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_auth_user(u: models::user::Model) -> AuthUser {
    AuthUser { id: UserId(u.id), email: u.email }
}

fn map_model_error(e: models::errors::ModelError) -> AuthError {
    match e {
        models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
        other => AuthError::Repository(other.to_string()),
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_email(&self.db, email).await.map_err(map_model_error)?;
        Ok(res.map(to_auth_user))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::Entity::find_by_id(id.as_uuid())
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_auth_user))
    }

    async fn create_user(&self, email: &str, password_hash: String, password_algorithm: &str) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(|e| AuthError::Repository(e.to_string()))?;
        if models::user::find_by_email(&txn, email).await.map_err(map_model_error)?.is_some() {
            return Err(AuthError::Conflict);
        }
        let created = models::user::create(&txn, email).await.map_err(map_model_error)?;
        models::user_credentials::upsert_password(&txn, created.id, password_hash, password_algorithm)
            .await
            .map_err(map_model_error)?;
        txn.commit().await.map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, user_id: UserId) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_for_user(&self.db, user_id.as_uuid())
            .await
            .map_err(map_model_error)?;
        Ok(res.map(|c| Credentials {
            user_id: UserId(c.user_id),
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }

    async fn revoke_token(&self, token_id: &str, user_id: UserId, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        models::revoked_token::revoke(&self.db, token_id, user_id.as_uuid(), expires_at)
            .await
            .map_err(map_model_error)
    }

    async fn is_token_revoked(&self, token_id: &str) -> Result<bool, AuthError> {
        models::revoked_token::is_revoked(&self.db, token_id).await.map_err(map_model_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, skip_db_tests};

    #[tokio::test]
    async fn create_user_with_credentials_and_reject_duplicates() -> Result<(), anyhow::Error> {
        if skip_db_tests() { return Ok(()); }
        let db = get_db().await?;
        let repo = SeaOrmAuthRepository { db: db.clone() };
        let email = format!("auth_{}@example.com", uuid::Uuid::new_v4());

        let user = repo.create_user(&email, "hash".into(), "argon2").await?;
        let creds = repo.get_credentials(user.id).await?.expect("credentials stored");
        assert_eq!(creds.password_hash, "hash");
        assert_eq!(repo.find_user_by_id(user.id).await?, Some(user.clone()));

        let dup = repo.create_user(&email.to_uppercase(), "hash".into(), "argon2").await;
        assert!(matches!(dup, Err(AuthError::Conflict)));

        let jti = uuid::Uuid::new_v4().to_string();
        assert!(!repo.is_token_revoked(&jti).await?);
        let expires = Utc::now() + chrono::Duration::hours(1);
        repo.revoke_token(&jti, user.id, expires).await?;
        repo.revoke_token(&jti, user.id, expires).await?;
        assert!(repo.is_token_revoked(&jti).await?);

        models::user::hard_delete(&db, user.id.as_uuid()).await?;
        Ok(())
    }
}
