// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Level;
use wingtip_cart::{CartError, CartItem, CartLine, CartResult, CartStore, MemoryCartStore, Product};

// --- Catalog fixtures ---
pub const CONVERTIBLE_CAR: i32 = 1;
pub const OLD_STYLE_RACER: i32 = 2;
pub const BUS: i32 = 5;

pub fn price(text: &str) -> Decimal {
  text.parse().unwrap()
}

pub fn catalog() -> Vec<Product> {
  vec![
    Product::new(CONVERTIBLE_CAR, "Convertible Car", price("22.50")),
    Product::new(OLD_STYLE_RACER, "Old-time Car", price("15.95")),
    Product::new(BUS, "Bus", price("10.00")),
  ]
}

pub fn memory_store() -> Arc<MemoryCartStore> {
  Arc::new(MemoryCartStore::with_products(catalog()))
}

// --- A store double whose writes fail ---
#[derive(Debug)]
pub struct FailingWritesStore {
  pub inner: MemoryCartStore,
}

impl FailingWritesStore {
  pub fn new() -> Self {
    Self {
      inner: MemoryCartStore::with_products(catalog()),
    }
  }

  fn failure(op: &str) -> CartError {
    CartError::store(op, anyhow::anyhow!("connection reset by peer"))
  }
}

#[async_trait]
impl CartStore for FailingWritesStore {
  async fn add_item(&self, cart_id: &str, product_id: i32) -> CartResult<CartItem> {
    self.inner.add_item(cart_id, product_id).await
  }

  async fn lines(&self, cart_id: &str) -> CartResult<Vec<CartLine>> {
    self.inner.lines(cart_id).await
  }

  async fn set_quantity(&self, _cart_id: &str, _product_id: i32, _quantity: i32) -> CartResult<bool> {
    Err(Self::failure("set quantity"))
  }

  async fn remove_item(&self, _cart_id: &str, _product_id: i32) -> CartResult<bool> {
    Err(Self::failure("delete cart item"))
  }

  async fn clear(&self, cart_id: &str) -> CartResult<u64> {
    self.inner.clear(cart_id).await
  }

  async fn reassign(&self, from_cart_id: &str, to_cart_id: &str) -> CartResult<u64> {
    self.inner.reassign(from_cart_id, to_cart_id).await
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
