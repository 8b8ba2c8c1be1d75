//! Coupon aggregate and its business rules.
//!
//! The entity is a plain struct with associated validators and lifecycle
//! methods. Time never comes from ambient `now()` here: callers pass the
//! current date or timestamp explicitly so every rule is testable with a
//! fixed clock.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error as ThisError;

use super::error::Error;

/// Identifier assigned by the persistence layer on first insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CouponId(i64);

impl CouponId {
    /// Wrap a raw database identifier.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw identifier.
    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for CouponId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for CouponId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized coupon code: exactly six uppercase ASCII alphanumerics.
///
/// Construction goes through [`CouponCode::normalize`], so a value of this
/// type is normalized by definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalized length every code is truncated to.
    pub const LENGTH: usize = 6;

    /// Normalize a raw code: keep only ASCII letters and digits, uppercase
    /// them, require at least six survivors, and truncate to the first six.
    ///
    /// Characters beyond the sixth are silently discarded even when valid.
    /// Lookups rely on the same truncation being applied on every
    /// code-bearing call, so callers must never bypass this constructor.
    pub fn normalize(raw: &str) -> Result<Self, Error> {
        let filtered: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if filtered.len() < Self::LENGTH {
            return Err(Error::invalid_format(format!(
                "coupon code must contain at least {} alphanumeric characters, found {}",
                Self::LENGTH,
                filtered.len()
            ))
            .with_details(json!({ "field": "code", "alphanumericLength": filtered.len() })));
        }

        Ok(Self(filtered.chars().take(Self::LENGTH).collect()))
    }

    /// Borrow the normalized code.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the wrapper and return the normalized string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CouponCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CouponCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Smallest discount a coupon may carry.
pub fn min_discount_value() -> Decimal {
    Decimal::new(5, 1)
}

/// Validate a discount value: at least 0.5, compared exactly, no upper bound.
pub fn validate_discount_value(value: Decimal) -> Result<(), Error> {
    if value < min_discount_value() {
        return Err(Error::out_of_range(format!(
            "discount value must be at least 0.5, found {value}"
        ))
        .with_details(json!({ "field": "discountValue", "value": value.to_string() })));
    }
    Ok(())
}

/// Validate an expiration date against the current date. Today itself is a
/// valid expiration date; only strictly past dates are rejected.
pub fn validate_expiration_date(date: NaiveDate, today: NaiveDate) -> Result<(), Error> {
    if date < today {
        return Err(Error::out_of_range(format!(
            "expiration date must not be in the past, found {date}"
        ))
        .with_details(json!({ "field": "expirationDate", "value": date.to_string() })));
    }
    Ok(())
}

/// Lifecycle failures raised by entity state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum CouponStateError {
    /// Soft delete is terminal; re-deleting is rejected, not ignored.
    #[error("coupon is already deleted")]
    AlreadyDeleted,
}

/// A persisted coupon.
///
/// The code is immutable after creation and the deleted flag, once true, is
/// absorbing: the only operations left are reads and unpublish.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    pub id: CouponId,
    pub code: CouponCode,
    pub description: String,
    pub discount_value: Decimal,
    pub expiration_date: NaiveDate,
    pub published: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Coupon {
    /// Whether the coupon has expired: strictly after the expiration date.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.expiration_date
    }

    /// Whether the coupon is active: neither deleted nor expired.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        !self.deleted && !self.is_expired(today)
    }

    /// Soft-delete the coupon, stamping `deleted_at`. Fails when the coupon
    /// is already deleted.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) -> Result<(), CouponStateError> {
        if self.deleted {
            return Err(CouponStateError::AlreadyDeleted);
        }
        self.deleted = true;
        self.deleted_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Mark the coupon as published. No precondition at the entity level;
    /// the service guards against publishing deleted coupons.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.published = true;
        self.updated_at = now;
    }

    /// Mark the coupon as unpublished. Permitted even on deleted coupons.
    pub fn unpublish(&mut self, now: DateTime<Utc>) {
        self.published = false;
        self.updated_at = now;
    }

    /// Project the coupon into its read-only view, computing the derived
    /// `active`/`expired` flags against the supplied date.
    pub fn to_view(&self, today: NaiveDate) -> CouponView {
        CouponView {
            id: self.id,
            code: self.code.as_str().to_owned(),
            description: self.description.clone(),
            discount_value: self.discount_value,
            expiration_date: self.expiration_date,
            published: self.published,
            deleted: self.deleted,
            active: self.is_active(today),
            expired: self.is_expired(today),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

/// Validated payload handed to the repository for insertion. Identifier and
/// timestamps are assigned at the persistence boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub code: CouponCode,
    pub description: String,
    pub discount_value: Decimal,
    pub expiration_date: NaiveDate,
    pub published: bool,
}

/// Read-only projection returned by the service. `active` and `expired` are
/// derived at projection time, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponView {
    pub id: CouponId,
    pub code: String,
    pub description: String,
    pub discount_value: Decimal,
    pub expiration_date: NaiveDate,
    pub published: bool,
    pub deleted: bool,
    pub active: bool,
    pub expired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use chrono::TimeZone;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn sample_coupon() -> Coupon {
        Coupon {
            id: CouponId::new(1),
            code: CouponCode::normalize("ABC123").expect("valid code"),
            description: "10% off".to_owned(),
            discount_value: Decimal::new(10, 0),
            expiration_date: date(2026, 9, 30),
            published: false,
            deleted: false,
            created_at: timestamp(),
            updated_at: timestamp(),
            deleted_at: None,
        }
    }

    #[rstest]
    #[case("AB@C-12#3!", "ABC123")]
    #[case("abc123", "ABC123")]
    #[case("ABC123", "ABC123")]
    #[case("  ab-cd-12  ", "ABCD12")]
    fn normalize_filters_and_uppercases(#[case] raw: &str, #[case] expected: &str) {
        let code = CouponCode::normalize(raw).expect("normalizable");
        assert_eq!(code.as_str(), expected);
    }

    #[rstest]
    fn normalize_truncates_to_six_characters() {
        // Trailing valid characters beyond the sixth are discarded.
        let code = CouponCode::normalize("ABCDEFGH").expect("normalizable");
        assert_eq!(code.as_str(), "ABCDEF");
    }

    #[rstest]
    fn normalize_is_idempotent() {
        let first = CouponCode::normalize("ab@c-12#3!").expect("normalizable");
        let second = CouponCode::normalize(first.as_str()).expect("normalizable");
        assert_eq!(first, second);
    }

    #[rstest]
    #[case("")]
    #[case("AB12")]
    #[case("@@@@@@@@")]
    #[case("a-b-c-1-2")]
    fn normalize_rejects_short_codes(#[case] raw: &str) {
        let error = CouponCode::normalize(raw).expect_err("too short");
        assert_eq!(error.code(), ErrorCode::InvalidFormat);
    }

    #[rstest]
    fn discount_boundary_is_inclusive() {
        assert!(validate_discount_value(Decimal::new(5, 1)).is_ok());
    }

    #[rstest]
    #[case(Decimal::new(49999, 5))]
    #[case(Decimal::ZERO)]
    #[case(Decimal::new(-1, 0))]
    fn discount_below_minimum_is_out_of_range(#[case] value: Decimal) {
        let error = validate_discount_value(value).expect_err("below minimum");
        assert_eq!(error.code(), ErrorCode::OutOfRange);
    }

    #[rstest]
    fn discount_has_no_upper_bound() {
        assert!(validate_discount_value(Decimal::new(1_000_000, 0)).is_ok());
    }

    #[rstest]
    fn expiration_today_is_valid() {
        let today = date(2026, 8, 24);
        assert!(validate_expiration_date(today, today).is_ok());
    }

    #[rstest]
    fn expiration_yesterday_is_out_of_range() {
        let today = date(2026, 8, 24);
        let error = validate_expiration_date(date(2026, 8, 23), today).expect_err("past date");
        assert_eq!(error.code(), ErrorCode::OutOfRange);
    }

    #[rstest]
    fn expired_strictly_after_expiration_date() {
        let coupon = sample_coupon();
        assert!(!coupon.is_expired(date(2026, 9, 30)));
        assert!(coupon.is_expired(date(2026, 10, 1)));
    }

    #[rstest]
    fn soft_delete_is_terminal() {
        let mut coupon = sample_coupon();
        coupon.soft_delete(timestamp()).expect("first delete");
        assert!(coupon.deleted);
        assert_eq!(coupon.deleted_at, Some(timestamp()));

        let error = coupon.soft_delete(timestamp()).expect_err("second delete");
        assert_eq!(error, CouponStateError::AlreadyDeleted);
    }

    #[rstest]
    fn deleted_coupon_is_inactive_even_before_expiry() {
        let mut coupon = sample_coupon();
        let today = date(2026, 8, 24);
        assert!(coupon.is_active(today));

        coupon.soft_delete(timestamp()).expect("delete");
        assert!(!coupon.is_active(today));
        assert!(!coupon.is_expired(today));
    }

    #[rstest]
    fn publish_toggles_regardless_of_deletion() {
        let mut coupon = sample_coupon();
        coupon.soft_delete(timestamp()).expect("delete");

        coupon.publish(timestamp());
        assert!(coupon.published);
        coupon.unpublish(timestamp());
        assert!(!coupon.published);
    }

    #[rstest]
    fn view_carries_derived_flags() {
        let coupon = sample_coupon();
        let view = coupon.to_view(date(2026, 10, 1));
        assert!(view.expired);
        assert!(!view.active);
        assert_eq!(view.code, "ABC123");
    }
}
