//! Discount coupon lifecycle service.
//!
//! Hexagonal layout: the `domain` module owns the entity, validation rules,
//! and the lifecycle service; `inbound::http` adapts Actix requests to the
//! driving ports; `outbound::persistence` implements the repository port for
//! PostgreSQL and in memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
