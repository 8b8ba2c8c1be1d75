//! Coupon HTTP handlers.
//!
//! ```text
//! POST   /cupons
//! GET    /cupons
//! GET    /cupons/{id}
//! GET    /cupons/code/{code}
//! PUT    /cupons/{id}
//! DELETE /cupons/{id}
//! POST   /cupons/{id}/publish
//! POST   /cupons/{id}/unpublish
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CouponId, CouponPatch, CouponView, CreateCoupon, Error};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, validate_description};
use crate::inbound::http::ApiResult;

/// Request payload for creating or updating a coupon.
///
/// Every field is optional at the serde level; the create handler enforces
/// presence of the required ones so a missing field maps to the domain
/// taxonomy instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponRequest {
    #[schema(example = "SUMMER25")]
    pub code: Option<String>,
    #[schema(example = "10% off site-wide")]
    pub description: Option<String>,
    pub discount_value: Option<Decimal>,
    pub expiration_date: Option<NaiveDate>,
    pub published: Option<bool>,
}

/// Response payload for a coupon, including the derived flags.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub id: i64,
    #[schema(example = "SUMMER")]
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<CouponView> for CouponResponse {
    fn from(view: CouponView) -> Self {
        Self {
            id: view.id.value(),
            code: view.code,
            description: view.description,
            discount_value: view.discount_value,
            expiration_date: view.expiration_date,
            published: view.published,
            deleted: view.deleted,
            active: view.active,
            expired: view.expired,
            created_at: view.created_at,
            updated_at: view.updated_at,
            deleted_at: view.deleted_at,
        }
    }
}

fn parse_create_request(payload: CouponRequest) -> Result<CreateCoupon, Error> {
    let code = payload.code.ok_or_else(|| missing_field_error("code"))?;
    let description = payload
        .description
        .ok_or_else(|| missing_field_error("description"))?;
    validate_description(&description)?;
    let discount_value = payload
        .discount_value
        .ok_or_else(|| missing_field_error("discountValue"))?;
    let expiration_date = payload
        .expiration_date
        .ok_or_else(|| missing_field_error("expirationDate"))?;

    Ok(CreateCoupon {
        code,
        description,
        discount_value,
        expiration_date,
        published: payload.published,
    })
}

fn parse_update_request(payload: CouponRequest) -> Result<CouponPatch, Error> {
    if let Some(description) = payload.description.as_deref() {
        validate_description(description)?;
    }
    // payload.code is dropped on purpose: a coupon cannot be renamed.
    Ok(CouponPatch {
        description: payload.description,
        discount_value: payload.discount_value,
        expiration_date: payload.expiration_date,
        published: payload.published,
    })
}

/// Create a new coupon.
#[utoipa::path(
    post,
    path = "/cupons",
    request_body = CouponRequest,
    responses(
        (status = 201, description = "Coupon created", body = CouponResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Duplicate live code", body = ErrorSchema)
    ),
    tags = ["cupons"],
    operation_id = "createCoupon"
)]
#[post("/cupons")]
pub async fn create_coupon(
    state: web::Data<HttpState>,
    payload: web::Json<CouponRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_create_request(payload.into_inner())?;
    let view = state.commands.create(request).await?;
    Ok(HttpResponse::Created().json(CouponResponse::from(view)))
}

/// List every non-deleted coupon.
#[utoipa::path(
    get,
    path = "/cupons",
    responses(
        (status = 200, description = "Live coupons", body = [CouponResponse])
    ),
    tags = ["cupons"],
    operation_id = "listCupons"
)]
#[get("/cupons")]
pub async fn list_cupons(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<CouponResponse>>> {
    let views = state.queries.list().await?;
    Ok(web::Json(
        views.into_iter().map(CouponResponse::from).collect(),
    ))
}

/// Fetch a coupon by id. Soft-deleted records remain reachable here.
#[utoipa::path(
    get,
    path = "/cupons/{id}",
    params(("id" = i64, Path, description = "Coupon identifier")),
    responses(
        (status = 200, description = "Coupon", body = CouponResponse),
        (status = 404, description = "Unknown id", body = ErrorSchema)
    ),
    tags = ["cupons"],
    operation_id = "getCupomById"
)]
#[get("/cupons/{id}")]
pub async fn get_cupom_by_id(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<web::Json<CouponResponse>> {
    let view = state.queries.get_by_id(CouponId::new(*id)).await?;
    Ok(web::Json(CouponResponse::from(view)))
}

/// Fetch a non-deleted coupon by code. The code is normalized before the
/// lookup, matching the normalization applied at creation.
#[utoipa::path(
    get,
    path = "/cupons/code/{code}",
    params(("code" = String, Path, description = "Raw coupon code")),
    responses(
        (status = 200, description = "Coupon", body = CouponResponse),
        (status = 400, description = "Code cannot be normalized", body = ErrorSchema),
        (status = 404, description = "Unknown code", body = ErrorSchema)
    ),
    tags = ["cupons"],
    operation_id = "getCupomByCode"
)]
#[get("/cupons/code/{code}")]
pub async fn get_cupom_by_code(
    state: web::Data<HttpState>,
    code: web::Path<String>,
) -> ApiResult<web::Json<CouponResponse>> {
    let view = state.queries.get_by_code(&code).await?;
    Ok(web::Json(CouponResponse::from(view)))
}

/// Update a live coupon. Only fields present in the body are applied; the
/// code field is ignored.
#[utoipa::path(
    put,
    path = "/cupons/{id}",
    params(("id" = i64, Path, description = "Coupon identifier")),
    request_body = CouponRequest,
    responses(
        (status = 200, description = "Updated coupon", body = CouponResponse),
        (status = 400, description = "Invalid request or deleted coupon", body = ErrorSchema),
        (status = 404, description = "Unknown id", body = ErrorSchema)
    ),
    tags = ["cupons"],
    operation_id = "updateCupom"
)]
#[put("/cupons/{id}")]
pub async fn update_cupom(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    payload: web::Json<CouponRequest>,
) -> ApiResult<web::Json<CouponResponse>> {
    let patch = parse_update_request(payload.into_inner())?;
    let view = state.commands.update(CouponId::new(*id), patch).await?;
    Ok(web::Json(CouponResponse::from(view)))
}

/// Soft-delete a coupon. The record is retained and stays reachable by id.
#[utoipa::path(
    delete,
    path = "/cupons/{id}",
    params(("id" = i64, Path, description = "Coupon identifier")),
    responses(
        (status = 204, description = "Coupon soft-deleted"),
        (status = 404, description = "Unknown id", body = ErrorSchema),
        (status = 409, description = "Already deleted", body = ErrorSchema)
    ),
    tags = ["cupons"],
    operation_id = "deleteCupom"
)]
#[delete("/cupons/{id}")]
pub async fn delete_cupom(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.commands.soft_delete(CouponId::new(*id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Publish a live coupon.
#[utoipa::path(
    post,
    path = "/cupons/{id}/publish",
    params(("id" = i64, Path, description = "Coupon identifier")),
    responses(
        (status = 200, description = "Published coupon", body = CouponResponse),
        (status = 400, description = "Coupon is deleted", body = ErrorSchema),
        (status = 404, description = "Unknown id", body = ErrorSchema)
    ),
    tags = ["cupons"],
    operation_id = "publishCupom"
)]
#[post("/cupons/{id}/publish")]
pub async fn publish_cupom(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<web::Json<CouponResponse>> {
    let view = state.commands.publish(CouponId::new(*id)).await?;
    Ok(web::Json(CouponResponse::from(view)))
}

/// Unpublish a coupon. Permitted even after soft-deletion.
#[utoipa::path(
    post,
    path = "/cupons/{id}/unpublish",
    params(("id" = i64, Path, description = "Coupon identifier")),
    responses(
        (status = 200, description = "Unpublished coupon", body = CouponResponse),
        (status = 404, description = "Unknown id", body = ErrorSchema)
    ),
    tags = ["cupons"],
    operation_id = "unpublishCupom"
)]
#[post("/cupons/{id}/unpublish")]
pub async fn unpublish_cupom(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<web::Json<CouponResponse>> {
    let view = state.commands.unpublish(CouponId::new(*id)).await?;
    Ok(web::Json(CouponResponse::from(view)))
}
