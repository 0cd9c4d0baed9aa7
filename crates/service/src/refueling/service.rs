use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::domain::{Refueling, RefuelingId, RefuelingParams};
use super::errors::RefuelingError;
use super::repository::RefuelingRepository;
use crate::auth::UserId;

/// Ownership-scoped refueling operations, independent of the web framework.
pub struct RefuelingService<R: RefuelingRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: RefuelingRepository + ?Sized> RefuelingService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn list(&self, owner: UserId) -> Result<Vec<Refueling>, RefuelingError> {
        self.repo.list_by_owner(owner).await
    }

    /// Load a record for the edit form.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn get(&self, owner: UserId, id: RefuelingId) -> Result<Refueling, RefuelingError> {
        match self.repo.find_owned(owner, id).await? {
            Some(r) => Ok(r),
            None => {
                warn!(id, "refueling_not_found");
                Err(RefuelingError::NotFound)
            }
        }
    }

    #[instrument(skip(self, params), fields(owner = %owner))]
    pub async fn create(&self, owner: UserId, params: &RefuelingParams) -> Result<Refueling, RefuelingError> {
        let fields = params.validate().map_err(RefuelingError::Invalid)?;
        let created = self.repo.insert(owner, &fields).await?;
        info!(id = created.id, liters = %created.liters, "refueling_created");
        Ok(created)
    }

    /// Ownership is checked before the input, so a foreign record never
    /// reveals validation feedback.
    #[instrument(skip(self, params), fields(owner = %owner))]
    pub async fn update(&self, owner: UserId, id: RefuelingId, params: &RefuelingParams) -> Result<Refueling, RefuelingError> {
        if self.repo.find_owned(owner, id).await?.is_none() {
            warn!(id, "refueling_not_found");
            return Err(RefuelingError::NotFound);
        }
        let fields = params.validate().map_err(RefuelingError::Invalid)?;
        let updated = self
            .repo
            .update_owned(owner, id, &fields)
            .await?
            .ok_or(RefuelingError::NotFound)?;
        info!(id, "refueling_updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn destroy(&self, owner: UserId, id: RefuelingId) -> Result<(), RefuelingError> {
        if !self.repo.delete_owned(owner, id).await? {
            warn!(id, "refueling_not_found");
            return Err(RefuelingError::NotFound);
        }
        info!(id, "refueling_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refueling::repo::memory::InMemoryRefuelingRepository;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn setup() -> (Arc<InMemoryRefuelingRepository>, RefuelingService<InMemoryRefuelingRepository>) {
        let repo = Arc::new(InMemoryRefuelingRepository::new());
        (repo.clone(), RefuelingService::new(repo))
    }

    fn valid() -> RefuelingParams {
        RefuelingParams::new("30", "600", "150")
    }

    #[tokio::test]
    async fn create_adds_exactly_one_record() {
        let (repo, svc) = setup();
        let owner = UserId::new();
        let created = svc.create(owner, &valid()).await.unwrap();
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(created.owner, owner);
        assert_eq!(created.liters, Decimal::from(30));
        assert_eq!(created.kilometers, Decimal::from(600));
        assert_eq!(created.cost, Decimal::from(150));
    }

    #[tokio::test]
    async fn create_with_blank_liters_persists_nothing() {
        let (repo, svc) = setup();
        let err = svc.create(UserId::new(), &RefuelingParams::new("", "600", "150")).await.unwrap_err();
        match err {
            RefuelingError::Invalid(errors) => {
                assert_eq!(errors.full_messages(), vec!["Liters is not a number and can't be blank"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.count().unwrap(), 0);

        let missing = RefuelingParams { liters: None, ..valid() };
        assert!(matches!(svc.create(UserId::new(), &missing).await, Err(RefuelingError::Invalid(_))));
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn list_is_owner_scoped_and_newest_first() {
        let (repo, svc) = setup();
        let (me, other) = (UserId::new(), UserId::new());
        let fields = valid().validate().unwrap();
        let now = Utc::now();
        let old = repo.insert_at(me, &fields, now - Duration::hours(2)).unwrap();
        let tie_a = repo.insert_at(me, &fields, now).unwrap();
        let tie_b = repo.insert_at(me, &fields, now).unwrap();
        repo.insert_at(other, &fields, now + Duration::hours(1)).unwrap();

        let ids: Vec<_> = svc.list(me).await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![tie_b.id, tie_a.id, old.id]);
        assert!(svc.list(other).await.unwrap().iter().all(|r| r.owner == other));
    }

    #[tokio::test]
    async fn owner_can_update() {
        let (repo, svc) = setup();
        let owner = UserId::new();
        let created = svc.create(owner, &valid()).await.unwrap();
        let updated = svc
            .update(owner, created.id, &RefuelingParams::new("42.5", "700", "180"))
            .await
            .unwrap();
        assert_eq!(updated.liters, Decimal::new(425, 1));
        assert_eq!(updated.owner, owner);
        assert_eq!(repo.get(created.id).unwrap().unwrap().cost, Decimal::from(180));
    }

    #[tokio::test]
    async fn invalid_update_leaves_record_unchanged() {
        let (repo, svc) = setup();
        let owner = UserId::new();
        let created = svc.create(owner, &valid()).await.unwrap();
        let err = svc
            .update(owner, created.id, &RefuelingParams::new("lots", "700", "180"))
            .await
            .unwrap_err();
        assert!(matches!(err, RefuelingError::Invalid(_)));
        assert_eq!(repo.get(created.id).unwrap().unwrap(), created);
    }

    #[tokio::test]
    async fn foreign_update_is_not_found_even_with_invalid_input() {
        let (repo, svc) = setup();
        let created = svc.create(UserId::new(), &valid()).await.unwrap();
        let intruder = UserId::new();

        let err = svc.update(intruder, created.id, &RefuelingParams::new("1", "1", "1")).await.unwrap_err();
        assert_eq!(err.to_string(), "Resource not found!");
        let err = svc.update(intruder, created.id, &RefuelingParams::new("", "1", "1")).await.unwrap_err();
        assert!(matches!(err, RefuelingError::NotFound));
        assert_eq!(repo.get(created.id).unwrap().unwrap(), created);
    }

    #[tokio::test]
    async fn foreign_destroy_keeps_record() {
        let (repo, svc) = setup();
        let created = svc.create(UserId::new(), &valid()).await.unwrap();
        let err = svc.destroy(UserId::new(), created.id).await.unwrap_err();
        assert!(matches!(err, RefuelingError::NotFound));
        assert!(repo.get(created.id).unwrap().is_some());
    }

    #[tokio::test]
    async fn owner_destroy_removes_record() {
        let (repo, svc) = setup();
        let owner = UserId::new();
        let created = svc.create(owner, &valid()).await.unwrap();
        svc.create(owner, &valid()).await.unwrap();
        svc.destroy(owner, created.id).await.unwrap();
        assert_eq!(repo.count().unwrap(), 1);
        assert!(matches!(svc.destroy(owner, created.id).await, Err(RefuelingError::NotFound)));
    }

    #[tokio::test]
    async fn missing_and_foreign_records_look_the_same() {
        let (_, svc) = setup();
        let created = svc.create(UserId::new(), &valid()).await.unwrap();
        let me = UserId::new();
        let foreign = svc.get(me, created.id).await.unwrap_err().to_string();
        let missing = svc.get(me, 9_999).await.unwrap_err().to_string();
        assert_eq!(foreign, missing);
    }
}
