//! Coupon lifecycle orchestration.
//!
//! The service owns the validation and normalization rules, delegates
//! storage to the [`CouponRepository`] port, and classifies every failure
//! into the domain error taxonomy. All validation runs before persistence:
//! a rejected request never leaves a partially constructed coupon behind.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use super::coupon::{
    validate_discount_value, validate_expiration_date, Coupon, CouponCode, CouponId, CouponView,
    NewCoupon,
};
use super::error::Error;
use super::ports::{
    CouponCommand, CouponPatch, CouponQuery, CouponRepository, CouponRepositoryError, CreateCoupon,
};

/// Domain service implementing the coupon driving ports.
#[derive(Clone)]
pub struct CouponService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> CouponService<R> {
    /// Create a new service around a repository and a clock.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

fn duplicate_code_error(code: &str) -> Error {
    Error::conflict(format!("a live coupon already exists with code {code}"))
        .with_details(json!({ "code": code }))
}

fn map_repo_error(error: CouponRepositoryError) -> Error {
    match error {
        CouponRepositoryError::DuplicateCode { code } => duplicate_code_error(&code),
        CouponRepositoryError::Connection { message } => {
            Error::internal(format!("coupon repository unavailable: {message}"))
        }
        CouponRepositoryError::Query { message } => {
            Error::internal(format!("coupon repository error: {message}"))
        }
    }
}

impl<R> CouponService<R>
where
    R: CouponRepository,
{
    async fn require(&self, id: CouponId) -> Result<Coupon, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| Error::not_found(format!("no coupon found with id {id}")))
    }
}

#[async_trait]
impl<R> CouponCommand for CouponService<R>
where
    R: CouponRepository,
{
    async fn create(&self, request: CreateCoupon) -> Result<CouponView, Error> {
        let today = self.clock.utc().date_naive();

        let code = CouponCode::normalize(&request.code)?;
        if self
            .repo
            .exists_by_code_excluding_deleted(&code)
            .await
            .map_err(map_repo_error)?
        {
            return Err(duplicate_code_error(code.as_str()));
        }

        validate_expiration_date(request.expiration_date, today)?;
        validate_discount_value(request.discount_value)?;

        let new_coupon = NewCoupon {
            code,
            description: request.description,
            discount_value: request.discount_value,
            expiration_date: request.expiration_date,
            published: request.published.unwrap_or(false),
        };

        // The existence check above is check-then-act: a concurrent insert
        // may still win, surfacing as DuplicateCode here.
        let coupon = self.repo.insert(new_coupon).await.map_err(map_repo_error)?;
        info!(id = %coupon.id, code = %coupon.code, "coupon created");
        Ok(coupon.to_view(today))
    }

    async fn update(&self, id: CouponId, patch: CouponPatch) -> Result<CouponView, Error> {
        let now = self.clock.utc();
        let today = now.date_naive();

        let mut coupon = self.require(id).await?;
        if coupon.deleted {
            return Err(Error::invalid_state("cannot update a deleted coupon"));
        }

        if let Some(value) = patch.discount_value {
            validate_discount_value(value)?;
            coupon.discount_value = value;
        }
        if let Some(date) = patch.expiration_date {
            validate_expiration_date(date, today)?;
            coupon.expiration_date = date;
        }
        if let Some(description) = patch.description {
            coupon.description = description;
        }
        if let Some(published) = patch.published {
            coupon.published = published;
        }
        coupon.updated_at = now;

        let coupon = self.repo.update(&coupon).await.map_err(map_repo_error)?;
        info!(id = %coupon.id, "coupon updated");
        Ok(coupon.to_view(today))
    }

    async fn soft_delete(&self, id: CouponId) -> Result<(), Error> {
        let now = self.clock.utc();

        let mut coupon = self.require(id).await?;
        coupon
            .soft_delete(now)
            .map_err(|err| Error::conflict(err.to_string()))?;

        self.repo.update(&coupon).await.map_err(map_repo_error)?;
        info!(id = %coupon.id, "coupon soft-deleted");
        Ok(())
    }

    async fn publish(&self, id: CouponId) -> Result<CouponView, Error> {
        let now = self.clock.utc();

        let mut coupon = self.require(id).await?;
        if coupon.deleted {
            return Err(Error::invalid_state("cannot publish a deleted coupon"));
        }

        coupon.publish(now);
        let coupon = self.repo.update(&coupon).await.map_err(map_repo_error)?;
        info!(id = %coupon.id, "coupon published");
        Ok(coupon.to_view(now.date_naive()))
    }

    async fn unpublish(&self, id: CouponId) -> Result<CouponView, Error> {
        let now = self.clock.utc();

        // No deleted guard: unpublishing a deleted coupon is permitted.
        let mut coupon = self.require(id).await?;
        coupon.unpublish(now);
        let coupon = self.repo.update(&coupon).await.map_err(map_repo_error)?;
        info!(id = %coupon.id, "coupon unpublished");
        Ok(coupon.to_view(now.date_naive()))
    }
}

#[async_trait]
impl<R> CouponQuery for CouponService<R>
where
    R: CouponRepository,
{
    async fn list(&self) -> Result<Vec<CouponView>, Error> {
        let today = self.clock.utc().date_naive();
        let coupons = self
            .repo
            .find_all_excluding_deleted()
            .await
            .map_err(map_repo_error)?;
        debug!(count = coupons.len(), "listed live coupons");
        Ok(coupons.iter().map(|c| c.to_view(today)).collect())
    }

    async fn get_by_id(&self, id: CouponId) -> Result<CouponView, Error> {
        let today = self.clock.utc().date_naive();
        let coupon = self.require(id).await?;
        Ok(coupon.to_view(today))
    }

    async fn get_by_code(&self, raw_code: &str) -> Result<CouponView, Error> {
        let today = self.clock.utc().date_naive();
        let code = CouponCode::normalize(raw_code)?;
        let coupon = self
            .repo
            .find_by_code_excluding_deleted(&code)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| Error::not_found(format!("no coupon found with code {code}")))?;
        Ok(coupon.to_view(today))
    }
}
