//! Shared application state for HTTP handlers.

use std::sync::Arc;

use crate::domain::{CouponCommand, CouponQuery};

/// Driving ports the handlers resolve through [`actix_web::web::Data`].
///
/// Handlers depend on the traits only, so tests can wire the same routes to
/// a service backed by an in-memory repository.
#[derive(Clone)]
pub struct HttpState {
    pub commands: Arc<dyn CouponCommand>,
    pub queries: Arc<dyn CouponQuery>,
}

impl HttpState {
    pub fn new(commands: Arc<dyn CouponCommand>, queries: Arc<dyn CouponQuery>) -> Self {
        Self { commands, queries }
    }
}
