// storefront/src/db/mod.rs

//! PostgreSQL plumbing: pool setup, schema bootstrap and the cart store.

pub mod cart_store;

pub use cart_store::PgCartStore;

use crate::config::AppConfig;
use crate::errors::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, instrument};

const SCHEMA_SQL: &str = include_str!("../../schema.sql");
const SEED_SQL: &str = include_str!("../../seed.sql");

pub async fn connect(config: &AppConfig) -> Result<PgPool> {
  let pool = PgPoolOptions::new()
    .max_connections(config.database_max_connections)
    .connect(&config.database_url)
    .await?;
  Ok(pool)
}

/// Creates missing tables and loads the starter catalog. Safe to run on every start.
#[instrument(name = "db::seed", skip(pool), err(Display))]
pub async fn seed(pool: &PgPool) -> Result<()> {
  sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
  sqlx::raw_sql(SEED_SQL).execute(pool).await?;
  info!("Database schema applied and catalog seeded.");
  Ok(())
}
