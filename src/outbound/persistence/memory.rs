//! In-memory `CouponRepository` used by integration tests and DB-less runs.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::{Coupon, CouponCode, CouponId, CouponRepository, CouponRepositoryError, NewCoupon};

/// Mutex-guarded map keyed by id. Enforces the same live-code uniqueness
/// rule as the Postgres partial index, so the service's insert race handling
/// behaves identically against both adapters.
pub struct InMemoryCouponRepository {
    clock: Arc<dyn Clock>,
    inner: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    next_id: i64,
    rows: BTreeMap<i64, Coupon>,
}

impl InMemoryCouponRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: Mutex::new(Store {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>, CouponRepositoryError> {
        self.inner
            .lock()
            .map_err(|_| CouponRepositoryError::connection("repository lock poisoned"))
    }
}

#[async_trait]
impl CouponRepository for InMemoryCouponRepository {
    async fn find_by_id(&self, id: CouponId) -> Result<Option<Coupon>, CouponRepositoryError> {
        Ok(self.store()?.rows.get(&id.value()).cloned())
    }

    async fn find_by_code(
        &self,
        code: &CouponCode,
    ) -> Result<Option<Coupon>, CouponRepositoryError> {
        let store = self.store()?;
        let mut matches: Vec<&Coupon> = store
            .rows
            .values()
            .filter(|c| c.code == *code)
            .collect();
        // Prefer the live row, then the most recently created one.
        matches.sort_by_key(|c| (c.deleted, std::cmp::Reverse(c.id)));
        Ok(matches.first().map(|c| (*c).clone()))
    }

    async fn find_by_code_excluding_deleted(
        &self,
        code: &CouponCode,
    ) -> Result<Option<Coupon>, CouponRepositoryError> {
        Ok(self
            .store()?
            .rows
            .values()
            .find(|c| !c.deleted && c.code == *code)
            .cloned())
    }

    async fn find_all_excluding_deleted(&self) -> Result<Vec<Coupon>, CouponRepositoryError> {
        Ok(self
            .store()?
            .rows
            .values()
            .filter(|c| !c.deleted)
            .cloned()
            .collect())
    }

    async fn exists_by_code_excluding_deleted(
        &self,
        code: &CouponCode,
    ) -> Result<bool, CouponRepositoryError> {
        Ok(self
            .store()?
            .rows
            .values()
            .any(|c| !c.deleted && c.code == *code))
    }

    async fn insert(&self, coupon: NewCoupon) -> Result<Coupon, CouponRepositoryError> {
        let now = self.clock.utc();
        let mut store = self.store()?;

        if store
            .rows
            .values()
            .any(|c| !c.deleted && c.code == coupon.code)
        {
            return Err(CouponRepositoryError::duplicate_code(coupon.code.as_str()));
        }

        let id = store.next_id;
        store.next_id += 1;

        let stored = Coupon {
            id: CouponId::new(id),
            code: coupon.code,
            description: coupon.description,
            discount_value: coupon.discount_value,
            expiration_date: coupon.expiration_date,
            published: coupon.published,
            deleted: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        store.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, coupon: &Coupon) -> Result<Coupon, CouponRepositoryError> {
        let mut store = self.store()?;
        if !store.rows.contains_key(&coupon.id.value()) {
            return Err(CouponRepositoryError::query(format!(
                "no coupon with id {} to update",
                coupon.id
            )));
        }
        store.rows.insert(coupon.id.value(), coupon.clone());
        Ok(coupon.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockable::DefaultClock;
    use rust_decimal::Decimal;

    fn repository() -> InMemoryCouponRepository {
        InMemoryCouponRepository::new(Arc::new(DefaultClock))
    }

    fn new_coupon(code: &str) -> NewCoupon {
        NewCoupon {
            code: CouponCode::normalize(code).expect("valid code"),
            description: "test coupon".to_owned(),
            discount_value: Decimal::new(10, 0),
            expiration_date: NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid date"),
            published: false,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let repo = repository();

        let first = repo.insert(new_coupon("ABC123")).await.expect("insert");
        let second = repo.insert(new_coupon("XYZ789")).await.expect("insert");

        assert_eq!(first.id, CouponId::new(1));
        assert_eq!(second.id, CouponId::new(2));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_live_code() {
        let repo = repository();
        repo.insert(new_coupon("ABC123")).await.expect("insert");

        let err = repo.insert(new_coupon("ABC123")).await.expect_err("dup");
        assert_eq!(err, CouponRepositoryError::duplicate_code("ABC123"));
    }

    #[tokio::test]
    async fn deleted_coupon_frees_its_code() {
        let repo = repository();
        let mut stored = repo.insert(new_coupon("ABC123")).await.expect("insert");

        stored.deleted = true;
        repo.update(&stored).await.expect("update");

        let reused = repo.insert(new_coupon("ABC123")).await.expect("reinsert");
        assert_eq!(reused.id, CouponId::new(2));

        // The non-filtering lookup prefers the live row.
        let code = CouponCode::normalize("ABC123").expect("valid code");
        let found = repo.find_by_code(&code).await.expect("query").expect("row");
        assert_eq!(found.id, CouponId::new(2));
    }

    #[tokio::test]
    async fn listing_excludes_deleted_rows() {
        let repo = repository();
        let mut first = repo.insert(new_coupon("ABC123")).await.expect("insert");
        repo.insert(new_coupon("XYZ789")).await.expect("insert");

        first.deleted = true;
        repo.update(&first).await.expect("update");

        let live = repo.find_all_excluding_deleted().await.expect("list");
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].code.as_str(), "XYZ789");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_a_query_error() {
        let repo = repository();
        let stored = repo.insert(new_coupon("ABC123")).await.expect("insert");
        let mut phantom = stored.clone();
        phantom.id = CouponId::new(99);

        let err = repo.update(&phantom).await.expect_err("unknown id");
        assert!(matches!(err, CouponRepositoryError::Query { .. }));
    }
}
