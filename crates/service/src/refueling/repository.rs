use async_trait::async_trait;

use super::domain::{Refueling, RefuelingFields, RefuelingId};
use super::errors::RefuelingError;
use crate::auth::UserId;

/// Persistence for refuelings. Every lookup and mutation is scoped by owner,
/// and each call is atomic on its own.
#[async_trait]
pub trait RefuelingRepository: Send + Sync {
    /// Newest first: `created_at` descending, then id descending.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Refueling>, RefuelingError>;
    async fn find_owned(&self, owner: UserId, id: RefuelingId) -> Result<Option<Refueling>, RefuelingError>;
    async fn insert(&self, owner: UserId, fields: &RefuelingFields) -> Result<Refueling, RefuelingError>;
    /// `None` when no record with this id belongs to `owner`.
    async fn update_owned(&self, owner: UserId, id: RefuelingId, fields: &RefuelingFields) -> Result<Option<Refueling>, RefuelingError>;
    /// `false` when no record with this id belongs to `owner`.
    async fn delete_owned(&self, owner: UserId, id: RefuelingId) -> Result<bool, RefuelingError>;
}
