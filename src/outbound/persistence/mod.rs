//! Persistence adapters for the coupon repository port.
//!
//! Two implementations exist:
//!
//! - [`DieselCouponRepository`]: PostgreSQL via Diesel with async support
//!   through `diesel-async` and `bb8` pooling. Diesel row structs
//!   (`models.rs`) and the schema definition (`schema.rs`) are internal
//!   details, never exposed to the domain.
//! - [`InMemoryCouponRepository`]: a mutex-guarded map used by integration
//!   tests and by DB-less runs. It enforces the same live-code uniqueness
//!   rule as the Postgres partial index.

mod diesel_coupon_repository;
mod memory;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_coupon_repository::DieselCouponRepository;
pub use memory::InMemoryCouponRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
