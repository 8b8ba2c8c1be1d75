//! Coupon domain: entity, validators, ports, and the lifecycle service.
//!
//! Everything here is transport and storage agnostic. Inbound adapters map
//! [`Error`] to protocol responses; outbound adapters implement the ports.

pub mod coupon;
pub mod coupon_service;
pub mod error;
pub mod ports;

pub use self::coupon::{
    min_discount_value, validate_discount_value, validate_expiration_date, Coupon, CouponCode,
    CouponId, CouponStateError, CouponView, NewCoupon,
};
pub use self::coupon_service::CouponService;
pub use self::error::{Error, ErrorCode};
pub use self::ports::{
    CouponCommand, CouponPatch, CouponQuery, CouponRepository, CouponRepositoryError, CreateCoupon,
};
