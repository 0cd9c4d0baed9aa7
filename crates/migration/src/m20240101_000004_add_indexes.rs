use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Refueling: owner listing, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_refueling_user_created")
                    .table(Refueling::Table)
                    .col(Refueling::UserId)
                    .col(Refueling::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_refueling_user_created")
                    .table(Refueling::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Refueling { Table, UserId, CreatedAt }
