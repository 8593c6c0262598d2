// storefront/src/main.rs

mod config;
mod db;
mod errors;
mod models;
mod session;
mod state;
mod web;

use crate::config::AppConfig;
use crate::db::PgCartStore;
use crate::session::SessionRegistry;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use wingtip_cart::ShoppingCart;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting Wingtip storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  let db_pool = match db::connect(&app_config).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  if app_config.seed_db {
    if let Err(e) = db::seed(&db_pool).await {
      tracing::error!(error = %e, "Failed to seed database.");
      return Err(std::io::Error::other(e.to_string()));
    }
  }

  let app_state = AppState {
    db_pool: db_pool.clone(),
    cart: ShoppingCart::new(Arc::new(PgCartStore::new(db_pool))),
    sessions: SessionRegistry::with_idle_timeout(Duration::from_secs(app_config.session_idle_timeout_secs)),
    config: app_config.clone(),
  };

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
