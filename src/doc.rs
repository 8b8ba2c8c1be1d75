//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the coupon API. The generated document backs Swagger UI in debug
//! builds.

use utoipa::OpenApi;

use crate::inbound::http::coupons::{CouponRequest, CouponResponse};
use crate::inbound::http::schemas::ErrorSchema;

/// OpenAPI document for the coupon REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cupom API",
        description = "Discount coupon lifecycle: creation, lookup, updates, publication, and soft deletion."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::coupons::create_coupon,
        crate::inbound::http::coupons::list_cupons,
        crate::inbound::http::coupons::get_cupom_by_id,
        crate::inbound::http::coupons::get_cupom_by_code,
        crate::inbound::http::coupons::update_cupom,
        crate::inbound::http::coupons::delete_cupom,
        crate::inbound::http::coupons::publish_cupom,
        crate::inbound::http::coupons::unpublish_cupom,
        crate::inbound::http::health::live,
    ),
    components(schemas(CouponRequest, CouponResponse, ErrorSchema)),
    tags(
        (name = "cupons", description = "Coupon lifecycle operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
