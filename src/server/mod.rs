//! Server construction and wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use mockable::{Clock, DefaultClock};
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::CouponService;
use crate::inbound::http::{self, HttpState};
use crate::outbound::persistence::{DieselCouponRepository, InMemoryCouponRepository};

/// Wire the driving ports to a repository, preferring the database pool
/// when one is configured.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            let repo = Arc::new(DieselCouponRepository::new(pool.clone()));
            let service = Arc::new(CouponService::new(repo, clock));
            HttpState::new(service.clone(), service)
        }
        None => {
            warn!("no database pool configured, coupons are stored in memory");
            let repo = Arc::new(InMemoryCouponRepository::new(clock.clone()));
            let service = Arc::new(CouponService::new(repo, clock));
            HttpState::new(service.clone(), service)
        }
    }
}

/// Construct an Actix HTTP server from the given configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let state = web::Data::new(build_http_state(&config));

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .configure(http::configure);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(config.bind_addr)?
    .run();

    Ok(server)
}
