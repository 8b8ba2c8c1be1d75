//! Ports at the edges of the coupon domain.
//!
//! The driven side is [`CouponRepository`], implemented by persistence
//! adapters with strongly typed errors so storage failures map into
//! predictable variants. The driving side is [`CouponCommand`] and
//! [`CouponQuery`], implemented by the domain service and consumed by the
//! HTTP adapter.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error as ThisError;

use super::coupon::{Coupon, CouponCode, CouponId, CouponView, NewCoupon};
use super::error::Error;

/// Errors surfaced by coupon persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum CouponRepositoryError {
    /// Repository connection could not be established.
    #[error("coupon repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("coupon repository query failed: {message}")]
    Query { message: String },
    /// The live-code uniqueness constraint rejected an insert. Raised by the
    /// storage layer when a concurrent insert wins the race after the
    /// service's existence check.
    #[error("a live coupon already exists with code {code}")]
    DuplicateCode { code: String },
}

impl CouponRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for uniqueness violations.
    pub fn duplicate_code(code: impl Into<String>) -> Self {
        Self::DuplicateCode { code: code.into() }
    }
}

/// Persistence port for coupons.
///
/// Soft-deleted records stay queryable by id and by the non-filtering code
/// lookup; the `excluding_deleted` variants implement the live-only views
/// the service builds uniqueness and listings on. `insert` is the only
/// operation allowed to assign an identifier and the creation timestamps.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Fetch a coupon by id, deleted or not.
    async fn find_by_id(&self, id: CouponId) -> Result<Option<Coupon>, CouponRepositoryError>;

    /// Fetch a coupon by normalized code, deleted or not.
    async fn find_by_code(&self, code: &CouponCode)
        -> Result<Option<Coupon>, CouponRepositoryError>;

    /// Fetch a non-deleted coupon by normalized code.
    async fn find_by_code_excluding_deleted(
        &self,
        code: &CouponCode,
    ) -> Result<Option<Coupon>, CouponRepositoryError>;

    /// List every non-deleted coupon.
    async fn find_all_excluding_deleted(&self) -> Result<Vec<Coupon>, CouponRepositoryError>;

    /// Whether a non-deleted coupon carries the given normalized code.
    async fn exists_by_code_excluding_deleted(
        &self,
        code: &CouponCode,
    ) -> Result<bool, CouponRepositoryError>;

    /// Insert a new coupon, assigning its id and creation timestamps.
    /// Fails with [`CouponRepositoryError::DuplicateCode`] when the
    /// live-code uniqueness constraint is violated.
    async fn insert(&self, coupon: NewCoupon) -> Result<Coupon, CouponRepositoryError>;

    /// Persist the current state of an existing coupon.
    async fn update(&self, coupon: &Coupon) -> Result<Coupon, CouponRepositoryError>;
}

/// Request payload for creating a coupon. The code arrives raw; the service
/// normalizes it before anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCoupon {
    pub code: String,
    pub description: String,
    pub discount_value: Decimal,
    pub expiration_date: NaiveDate,
    pub published: Option<bool>,
}

/// Optional-field update payload. Deliberately has no code field: a coupon
/// cannot be renamed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponPatch {
    pub description: Option<String>,
    pub discount_value: Option<Decimal>,
    pub expiration_date: Option<NaiveDate>,
    pub published: Option<bool>,
}

/// Driving port for coupon mutations.
#[async_trait]
pub trait CouponCommand: Send + Sync {
    /// Create a coupon after normalization, duplicate check, and validation.
    async fn create(&self, request: CreateCoupon) -> Result<CouponView, Error>;

    /// Apply the present fields of a patch to a live coupon.
    async fn update(&self, id: CouponId, patch: CouponPatch) -> Result<CouponView, Error>;

    /// Soft-delete a coupon. Terminal: repeating the call is a conflict.
    async fn soft_delete(&self, id: CouponId) -> Result<(), Error>;

    /// Publish a live coupon.
    async fn publish(&self, id: CouponId) -> Result<CouponView, Error>;

    /// Unpublish a coupon, deleted or not.
    async fn unpublish(&self, id: CouponId) -> Result<CouponView, Error>;
}

/// Driving port for coupon lookups.
#[async_trait]
pub trait CouponQuery: Send + Sync {
    /// List every non-deleted coupon, projected at response time.
    async fn list(&self) -> Result<Vec<CouponView>, Error>;

    /// Fetch a coupon by id. Deleted records remain reachable this way.
    async fn get_by_id(&self, id: CouponId) -> Result<CouponView, Error>;

    /// Normalize the raw code, then fetch the matching non-deleted coupon.
    async fn get_by_code(&self, raw_code: &str) -> Result<CouponView, Error>;
}
