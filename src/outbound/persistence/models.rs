//! Internal Diesel row structs for the coupon table.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::cupons;

/// Row struct for reading from the cupons table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cupons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CouponRow {
    pub id: i64,
    pub code: String,
    pub description: String,
    pub discount_value: Decimal,
    pub expiration_date: NaiveDate,
    pub published: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating coupon records. The id and creation
/// timestamps come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cupons)]
pub(crate) struct NewCouponRow<'a> {
    pub code: &'a str,
    pub description: &'a str,
    pub discount_value: Decimal,
    pub expiration_date: NaiveDate,
    pub published: bool,
}

/// Changeset struct writing back every mutable column of a coupon.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cupons)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CouponChangeset<'a> {
    pub description: &'a str,
    pub discount_value: Decimal,
    pub expiration_date: NaiveDate,
    pub published: bool,
    pub deleted: bool,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
