//! Diesel schema for the coupon table.
//!
//! Kept in lockstep with the SQL in `migrations/`. The live-code uniqueness
//! rule is a partial unique index on `code WHERE NOT deleted`, which Diesel's
//! DSL does not model; the repository relies on the database raising a unique
//! violation.

diesel::table! {
    cupons (id) {
        id -> Int8,
        #[max_length = 6]
        code -> Varchar,
        description -> Varchar,
        discount_value -> Numeric,
        expiration_date -> Date,
        published -> Bool,
        deleted -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}
