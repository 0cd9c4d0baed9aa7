use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait};

use crate::auth::UserId;
use crate::refueling::domain::{Refueling, RefuelingFields, RefuelingId};
use crate::refueling::errors::RefuelingError;
use crate::refueling::repository::RefuelingRepository;
use models::refueling::{self, Entity as RefuelingEntity};

/// SeaORM-backed repository implementation.
pub struct SeaOrmRefuelingRepository {
    pub db: DatabaseConnection,
}

fn db_err(e: sea_orm::DbErr) -> RefuelingError {
    RefuelingError::Repository(e.to_string())
}

fn owned(owner: UserId, id: RefuelingId) -> sea_orm::Select<RefuelingEntity> {
    RefuelingEntity::find()
        .filter(refueling::Column::Id.eq(id))
        .filter(refueling::Column::UserId.eq(owner.as_uuid()))
}

#[async_trait]
impl RefuelingRepository for SeaOrmRefuelingRepository {
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Refueling>, RefuelingError> {
        let rows = RefuelingEntity::find()
            .filter(refueling::Column::UserId.eq(owner.as_uuid()))
            .order_by_desc(refueling::Column::CreatedAt)
            .order_by_desc(refueling::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Refueling::from).collect())
    }

    async fn find_owned(&self, owner: UserId, id: RefuelingId) -> Result<Option<Refueling>, RefuelingError> {
        let row = owned(owner, id).one(&self.db).await.map_err(db_err)?;
        Ok(row.map(Refueling::from))
    }

    async fn insert(&self, owner: UserId, fields: &RefuelingFields) -> Result<Refueling, RefuelingError> {
        let created = refueling::create(&self.db, owner.as_uuid(), fields).await?;
        Ok(created.into())
    }

    async fn update_owned(&self, owner: UserId, id: RefuelingId, fields: &RefuelingFields) -> Result<Option<Refueling>, RefuelingError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let Some(existing) = owned(owner, id).lock_exclusive().one(&txn).await.map_err(db_err)? else {
            return Ok(None);
        };
        let updated = refueling::apply_fields(&txn, existing, fields).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(Some(updated.into()))
    }

    async fn delete_owned(&self, owner: UserId, id: RefuelingId) -> Result<bool, RefuelingError> {
        let res = RefuelingEntity::delete_many()
            .filter(refueling::Column::Id.eq(id))
            .filter(refueling::Column::UserId.eq(owner.as_uuid()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, skip_db_tests};
    use std::str::FromStr;

    fn fields(liters: &str) -> RefuelingFields {
        RefuelingFields {
            liters: rust_decimal::Decimal::from_str(liters).unwrap(),
            kilometers: rust_decimal::Decimal::from(600),
            cost: rust_decimal::Decimal::from(150),
        }
    }

    #[tokio::test]
    async fn owner_scoped_crud() -> Result<(), anyhow::Error> {
        if skip_db_tests() { return Ok(()); }
        let db = get_db().await?;
        let owner = models::user::create(&db, &format!("svc_{}@example.com", uuid::Uuid::new_v4())).await?;
        let other = models::user::create(&db, &format!("svc_{}@example.com", uuid::Uuid::new_v4())).await?;
        let (owner_id, other_id) = (UserId(owner.id), UserId(other.id));
        let repo = SeaOrmRefuelingRepository { db: db.clone() };

        let first = repo.insert(owner_id, &fields("30")).await?;
        let second = repo.insert(owner_id, &fields("20.5")).await?;
        repo.insert(other_id, &fields("400")).await?;

        let listed = repo.list_by_owner(owner_id).await?;
        assert_eq!(listed.iter().map(|r| r.id).collect::<Vec<_>>(), vec![second.id, first.id]);

        assert!(repo.find_owned(other_id, first.id).await?.is_none());
        assert!(repo.update_owned(other_id, first.id, &fields("1")).await?.is_none());
        assert!(!repo.delete_owned(other_id, first.id).await?);

        let updated = repo.update_owned(owner_id, first.id, &fields("31")).await?.unwrap();
        assert_eq!(updated.liters, rust_decimal::Decimal::from(31));
        assert_eq!(updated.created_at, first.created_at);

        assert!(repo.delete_owned(owner_id, first.id).await?);
        assert!(repo.find_owned(owner_id, first.id).await?.is_none());

        // cleanup, cascades to refuelings
        models::user::hard_delete(&db, owner.id).await?;
        models::user::hard_delete(&db, other.id).await?;
        Ok(())
    }
}
