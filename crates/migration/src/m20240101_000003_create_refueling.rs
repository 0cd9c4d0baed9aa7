//! Create `refueling` table.
//!
//! Ids are sequential so that equal `created_at` values still sort by insertion order.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Refueling::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Refueling::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(uuid(Refueling::UserId).not_null())
                    .col(decimal(Refueling::Liters).not_null())
                    .col(decimal(Refueling::Kilometers).not_null())
                    .col(decimal(Refueling::Cost).not_null())
                    .col(timestamp_with_time_zone(Refueling::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Refueling::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_refueling_user")
                            .from(Refueling::Table, Refueling::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Refueling::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Refueling {
    Table,
    Id,
    UserId,
    Liters,
    Kilometers,
    Cost,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
