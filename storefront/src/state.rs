// storefront/src/state.rs
use crate::config::AppConfig;
use crate::session::SessionRegistry;
use sqlx::PgPool;
use std::sync::Arc;
use wingtip_cart::ShoppingCart;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub cart: ShoppingCart,
  pub sessions: SessionRegistry,
  pub config: Arc<AppConfig>, // Share loaded config
}
