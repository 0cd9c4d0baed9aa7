use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revoked_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub jti: String,
    pub user_id: Uuid,
    pub expires_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Record a signed-out token. Revoking twice is a no-op. Rows whose token has
/// expired anyway are pruned on the way.
pub async fn revoke<C: ConnectionTrait>(
    db: &C,
    jti: &str,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<(), ModelError> {
    let now = Utc::now();
    Entity::delete_many()
        .filter(Column::ExpiresAt.lt(now))
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    if is_revoked(db, jti).await? {
        return Ok(());
    }
    let am = ActiveModel {
        jti: Set(jti.to_string()),
        user_id: Set(user_id),
        expires_at: Set(expires_at.into()),
        created_at: Set(now.into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(())
}

pub async fn is_revoked<C: ConnectionTrait>(db: &C, jti: &str) -> Result<bool, ModelError> {
    let found = Entity::find_by_id(jti.to_string())
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(found.is_some())
}
