//! Entry point: wires configuration, migrations, and the HTTP server.

use std::env;
use std::net::SocketAddr;

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use cupom_api::outbound::persistence::{DbPool, PoolConfig};
use cupom_api::server::{create_server, ServerConfig};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Bring the schema up to date before the pool starts serving requests.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|e| std::io::Error::other(format!("failed to connect for migrations: {e}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| std::io::Error::other(format!("failed to run migrations: {e}")))?;
    info!(count = applied.len(), "migrations applied");
    Ok(())
}

fn bind_addr() -> std::io::Result<SocketAddr> {
    let raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    raw.parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR {raw}: {e}")))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let mut config = ServerConfig::new(bind_addr()?);

    match env::var("DATABASE_URL") {
        Ok(database_url) => {
            run_migrations(&database_url)?;
            let pool = DbPool::new(PoolConfig::new(&database_url))
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            config = config.with_db_pool(pool);
        }
        Err(_) => warn!("DATABASE_URL not set, coupons will not survive restarts"),
    }

    info!(addr = %config.bind_addr(), "starting cupom-api");
    create_server(config)?.await
}
