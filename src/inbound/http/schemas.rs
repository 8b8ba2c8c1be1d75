//! OpenAPI-only schema types.

use serde::Serialize;
use utoipa::ToSchema;

/// Shape of the JSON error body produced by the [`actix_web::ResponseError`]
/// impl on [`crate::domain::Error`]. Exists so the OpenAPI document can
/// describe error responses without coupling the domain type to `utoipa`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_format")]
    pub code: String,
    /// Human-readable explanation.
    #[schema(example = "coupon code must contain at least 6 alphanumeric characters")]
    pub message: String,
    /// Optional structured context, such as the offending field.
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}
