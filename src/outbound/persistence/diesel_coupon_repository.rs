//! PostgreSQL-backed `CouponRepository` implementation using Diesel ORM.
//!
//! A thin adapter: it translates between Diesel rows and the domain entity
//! and maps storage failures onto [`CouponRepositoryError`]. The live-code
//! uniqueness rule lives in the database as a partial unique index; a unique
//! violation on insert surfaces as [`CouponRepositoryError::DuplicateCode`].

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::{Coupon, CouponCode, CouponId, CouponRepository, CouponRepositoryError, NewCoupon};

use super::models::{CouponChangeset, CouponRow, NewCouponRow};
use super::pool::{DbPool, PoolError};
use super::schema::cupons;

/// Diesel-backed implementation of the `CouponRepository` port.
#[derive(Clone)]
pub struct DieselCouponRepository {
    pool: DbPool,
}

impl DieselCouponRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to coupon repository errors.
fn map_pool_error(error: PoolError) -> CouponRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CouponRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to coupon repository errors. Unique violations are
/// handled separately by [`map_insert_error`] where the code is known.
fn map_diesel_error(error: diesel::result::Error) -> CouponRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => CouponRepositoryError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CouponRepositoryError::connection("database connection error")
        }
        _ => CouponRepositoryError::query("database error"),
    }
}

/// Map errors from the insert path, where a unique violation means the
/// partial index on live codes rejected the row.
fn map_insert_error(error: diesel::result::Error, code: &CouponCode) -> CouponRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    ) {
        return CouponRepositoryError::duplicate_code(code.as_str());
    }
    map_diesel_error(error)
}

/// Convert a database row to the domain entity.
///
/// Stored codes were normalized before insertion, so re-normalization is a
/// no-op; a failure here means the table holds data this service never wrote.
fn row_to_coupon(row: CouponRow) -> Result<Coupon, CouponRepositoryError> {
    let code = CouponCode::normalize(&row.code).map_err(|_| {
        CouponRepositoryError::query(format!("stored coupon code is not normalized: {}", row.code))
    })?;

    Ok(Coupon {
        id: CouponId::new(row.id),
        code,
        description: row.description,
        discount_value: row.discount_value,
        expiration_date: row.expiration_date,
        published: row.published,
        deleted: row.deleted,
        created_at: row.created_at,
        updated_at: row.updated_at,
        deleted_at: row.deleted_at,
    })
}

fn changeset_for(coupon: &Coupon) -> CouponChangeset<'_> {
    CouponChangeset {
        description: &coupon.description,
        discount_value: coupon.discount_value,
        expiration_date: coupon.expiration_date,
        published: coupon.published,
        deleted: coupon.deleted,
        updated_at: coupon.updated_at,
        deleted_at: coupon.deleted_at,
    }
}

#[async_trait]
impl CouponRepository for DieselCouponRepository {
    async fn find_by_id(&self, id: CouponId) -> Result<Option<Coupon>, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CouponRow> = cupons::table
            .find(id.value())
            .select(CouponRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_coupon).transpose()
    }

    async fn find_by_code(
        &self,
        code: &CouponCode,
    ) -> Result<Option<Coupon>, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Several rows may share a code once older ones are soft-deleted;
        // prefer the live one, then the most recent.
        let row: Option<CouponRow> = cupons::table
            .filter(cupons::code.eq(code.as_str()))
            .order((cupons::deleted.asc(), cupons::id.desc()))
            .select(CouponRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_coupon).transpose()
    }

    async fn find_by_code_excluding_deleted(
        &self,
        code: &CouponCode,
    ) -> Result<Option<Coupon>, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CouponRow> = cupons::table
            .filter(cupons::code.eq(code.as_str()))
            .filter(cupons::deleted.eq(false))
            .select(CouponRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_coupon).transpose()
    }

    async fn find_all_excluding_deleted(&self) -> Result<Vec<Coupon>, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CouponRow> = cupons::table
            .filter(cupons::deleted.eq(false))
            .order(cupons::id.asc())
            .select(CouponRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_coupon).collect()
    }

    async fn exists_by_code_excluding_deleted(
        &self,
        code: &CouponCode,
    ) -> Result<bool, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(exists(
            cupons::table
                .filter(cupons::code.eq(code.as_str()))
                .filter(cupons::deleted.eq(false)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert(&self, coupon: NewCoupon) -> Result<Coupon, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewCouponRow {
            code: coupon.code.as_str(),
            description: &coupon.description,
            discount_value: coupon.discount_value,
            expiration_date: coupon.expiration_date,
            published: coupon.published,
        };

        let row: CouponRow = diesel::insert_into(cupons::table)
            .values(&new_row)
            .returning(CouponRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, &coupon.code))?;

        row_to_coupon(row)
    }

    async fn update(&self, coupon: &Coupon) -> Result<Coupon, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: CouponRow = diesel::update(cupons::table.find(coupon.id.value()))
            .set(changeset_for(coupon))
            .returning(CouponRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_coupon(row)
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping and row conversion coverage. Live database behaviour is
    //! exercised by integration environments, not unit tests.
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn sample_row() -> CouponRow {
        CouponRow {
            id: 7,
            code: "ABC123".to_owned(),
            description: "10% off".to_owned(),
            discount_value: Decimal::new(10, 0),
            expiration_date: NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date"),
            published: true,
            deleted: false,
            created_at: Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).single().expect("ts"),
            updated_at: Utc.with_ymd_and_hms(2026, 8, 2, 9, 0, 0).single().expect("ts"),
            deleted_at: None,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, CouponRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, CouponRepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn unique_violation_on_insert_maps_to_duplicate_code() {
        let code = CouponCode::normalize("ABC123").expect("valid code");
        let diesel_err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );

        let repo_err = map_insert_error(diesel_err, &code);

        assert_eq!(repo_err, CouponRepositoryError::duplicate_code("ABC123"));
    }

    #[rstest]
    fn other_insert_errors_keep_their_mapping() {
        let code = CouponCode::normalize("ABC123").expect("valid code");
        let repo_err = map_insert_error(diesel::result::Error::NotFound, &code);

        assert!(matches!(repo_err, CouponRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_converts_to_domain_entity() {
        let coupon = row_to_coupon(sample_row()).expect("convertible");

        assert_eq!(coupon.id, CouponId::new(7));
        assert_eq!(coupon.code.as_str(), "ABC123");
        assert!(coupon.published);
        assert!(!coupon.deleted);
    }

    #[rstest]
    fn denormalized_stored_code_is_a_query_error() {
        let mut row = sample_row();
        row.code = "ab".to_owned();

        let err = row_to_coupon(row).expect_err("short stored code");
        assert!(matches!(err, CouponRepositoryError::Query { .. }));
    }
}
