//! HTTP inbound adapter: handlers, request/response shapes, error mapping.

pub mod coupons;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
mod validation;

pub use self::error::ApiResult;
pub use self::state::HttpState;

use actix_web::web;

/// Register every coupon route on an Actix service config.
///
/// Shared between the production server and the integration tests so both
/// exercise the same routing table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(coupons::create_coupon)
        .service(coupons::list_cupons)
        .service(coupons::get_cupom_by_code)
        .service(coupons::get_cupom_by_id)
        .service(coupons::update_cupom)
        .service(coupons::delete_cupom)
        .service(coupons::publish_cupom)
        .service(coupons::unpublish_cupom);
    health::configure(cfg);
}
