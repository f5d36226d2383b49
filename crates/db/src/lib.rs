pub mod config;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::debug;

pub use config::DatabaseSettings;

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(settings: &DatabaseSettings, max_connections: u32) -> Result<DbPool> {
    debug!(
        "Opening Postgres pool: max_connections={}, require_ssl={}",
        max_connections, settings.require_ssl
    );

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(settings.connect_timeout)
        .connect_with(settings.connect_options()?)
        .await?;

    Ok(pool)
}
