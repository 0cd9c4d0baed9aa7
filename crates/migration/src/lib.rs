//! Migrator registering entity-specific migrations in dependency order.
//! Indexes for the core tables are applied after them; later tables carry their own.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user;
mod m20240101_000002_create_user_credentials;
mod m20240101_000003_create_refueling;
mod m20240101_000004_add_indexes;
mod m20240101_000005_create_revoked_token;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user::Migration),
            Box::new(m20240101_000002_create_user_credentials::Migration),
            Box::new(m20240101_000003_create_refueling::Migration),
            // Indexes for the tables above
            Box::new(m20240101_000004_add_indexes::Migration),
            Box::new(m20240101_000005_create_revoked_token::Migration),
        ]
    }
}
