//! In-memory repository for tests and local demos.
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::UserId;
use crate::refueling::domain::{Refueling, RefuelingFields, RefuelingId};
use crate::refueling::errors::RefuelingError;
use crate::refueling::repository::RefuelingRepository;

#[derive(Default)]
struct Table {
    rows: Vec<Refueling>,
    next_id: RefuelingId,
}

#[derive(Default)]
pub struct InMemoryRefuelingRepository {
    table: Mutex<Table>,
}

impl InMemoryRefuelingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, RefuelingError> {
        self.table
            .lock()
            .map_err(|_| RefuelingError::Repository("in-memory refueling store poisoned".into()))
    }

    /// Insert with an explicit creation time, e.g. to load fixtures.
    pub fn insert_at(
        &self,
        owner: UserId,
        fields: &RefuelingFields,
        created_at: DateTime<Utc>,
    ) -> Result<Refueling, RefuelingError> {
        let mut table = self.lock()?;
        table.next_id += 1;
        let row = Refueling {
            id: table.next_id,
            owner,
            liters: fields.liters,
            kilometers: fields.kilometers,
            cost: fields.cost,
            created_at,
            updated_at: created_at,
        };
        table.rows.push(row.clone());
        Ok(row)
    }

    /// Total number of stored records across all owners.
    pub fn count(&self) -> Result<usize, RefuelingError> {
        Ok(self.lock()?.rows.len())
    }

    /// Fetch regardless of owner.
    pub fn get(&self, id: RefuelingId) -> Result<Option<Refueling>, RefuelingError> {
        Ok(self.lock()?.rows.iter().find(|r| r.id == id).cloned())
    }
}

#[async_trait]
impl RefuelingRepository for InMemoryRefuelingRepository {
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Refueling>, RefuelingError> {
        let table = self.lock()?;
        let mut rows: Vec<Refueling> = table.rows.iter().filter(|r| r.owner == owner).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find_owned(&self, owner: UserId, id: RefuelingId) -> Result<Option<Refueling>, RefuelingError> {
        let table = self.lock()?;
        Ok(table.rows.iter().find(|r| r.id == id && r.owner == owner).cloned())
    }

    async fn insert(&self, owner: UserId, fields: &RefuelingFields) -> Result<Refueling, RefuelingError> {
        self.insert_at(owner, fields, Utc::now())
    }

    async fn update_owned(&self, owner: UserId, id: RefuelingId, fields: &RefuelingFields) -> Result<Option<Refueling>, RefuelingError> {
        let mut table = self.lock()?;
        let Some(row) = table.rows.iter_mut().find(|r| r.id == id && r.owner == owner) else {
            return Ok(None);
        };
        row.liters = fields.liters;
        row.kilometers = fields.kilometers;
        row.cost = fields.cost;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_owned(&self, owner: UserId, id: RefuelingId) -> Result<bool, RefuelingError> {
        let mut table = self.lock()?;
        let before = table.rows.len();
        table.rows.retain(|r| !(r.id == id && r.owner == owner));
        Ok(table.rows.len() < before)
    }
}
