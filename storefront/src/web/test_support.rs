// storefront/src/web/test_support.rs

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::web;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use wingtip_cart::{MemoryCartStore, Product, ShoppingCart};

use crate::config::AppConfig;
use crate::session::SessionRegistry;
use crate::state::AppState;

pub const COOKIE_NAME: &str = "wingtip_session";
pub const CAR: i32 = 1;
pub const PLANE: i32 = 5;

/// App state over an in-memory cart store. The pool is lazy and never connects, so only
/// routes that stay off the catalog tables can be exercised.
pub fn test_state() -> (web::Data<AppState>, Arc<MemoryCartStore>) {
  let store = Arc::new(MemoryCartStore::with_products([
    Product::new(CAR, "Convertible Car", Decimal::new(2250, 2)),
    Product::new(PLANE, "Paper Plane", Decimal::new(495, 2)),
  ]));

  let config = AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "postgres://localhost/wingtip_test".to_string(),
    database_max_connections: 1,
    session_cookie_name: COOKIE_NAME.to_string(),
    session_idle_timeout_secs: 1800,
    seed_db: false,
  };
  let db_pool = PgPoolOptions::new()
    .max_connections(1)
    .connect_lazy(&config.database_url)
    .unwrap();

  let state = AppState {
    db_pool,
    cart: ShoppingCart::new(store.clone()),
    sessions: SessionRegistry::new(),
    config: Arc::new(config),
  };
  (web::Data::new(state), store)
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
  resp
    .response()
    .cookies()
    .find(|c| c.name() == COOKIE_NAME)
    .map(|c| c.into_owned())
    .unwrap()
}
