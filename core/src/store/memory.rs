// core/src/store/memory.rs

//! A process-local `CartStore`, used by tests, benches and local development.

use crate::error::{CartError, CartResult};
use crate::model::{CartItem, CartLine, Product};
use crate::store::CartStore;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use tracing::debug;

/// Cart rows and a product catalog held in memory.
///
/// Every `CartStore` call takes the row lock once, so each primitive is atomic.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
  products: RwLock<HashMap<i32, Product>>,
  items: Mutex<Vec<CartItem>>,
}

impl MemoryCartStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// A store whose catalog holds the given products.
  pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
    let store = Self::new();
    for product in products {
      store.insert_product(product);
    }
    store
  }

  /// Adds or replaces a catalog product.
  pub fn insert_product(&self, product: Product) {
    self.products.write().insert(product.product_id, product);
  }

  /// Every persisted row, across all carts.
  pub fn all_items(&self) -> Vec<CartItem> {
    self.items.lock().clone()
  }
}

#[async_trait]
impl CartStore for MemoryCartStore {
  async fn add_item(&self, cart_id: &str, product_id: i32) -> CartResult<CartItem> {
    if !self.products.read().contains_key(&product_id) {
      return Err(CartError::ProductNotFound { product_id });
    }

    let mut items = self.items.lock();
    if let Some(existing) = items
      .iter_mut()
      .find(|item| item.cart_id == cart_id && item.product_id == product_id)
    {
      existing.quantity = existing
        .quantity
        .checked_add(1)
        .ok_or_else(|| CartError::QuantityOverflow {
          cart_id: cart_id.to_string(),
          product_id,
        })?;
      debug!(cart_id, product_id, quantity = existing.quantity, "Incremented cart item.");
      return Ok(existing.clone());
    }

    let item = CartItem::new(cart_id, product_id);
    debug!(cart_id, product_id, item_id = %item.item_id, "Created cart item.");
    items.push(item.clone());
    Ok(item)
  }

  async fn lines(&self, cart_id: &str) -> CartResult<Vec<CartLine>> {
    let products = self.products.read();
    let items = self.items.lock();
    items
      .iter()
      .filter(|item| item.cart_id == cart_id)
      .map(|item| {
        let product = products
          .get(&item.product_id)
          .ok_or(CartError::ProductNotFound {
            product_id: item.product_id,
          })?;
        Ok(CartLine {
          item: item.clone(),
          product_name: product.product_name.clone(),
          unit_price: product.unit_price,
        })
      })
      .collect()
  }

  async fn set_quantity(&self, cart_id: &str, product_id: i32, quantity: i32) -> CartResult<bool> {
    let mut items = self.items.lock();
    match items
      .iter_mut()
      .find(|item| item.cart_id == cart_id && item.product_id == product_id)
    {
      Some(item) => {
        item.quantity = quantity;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn remove_item(&self, cart_id: &str, product_id: i32) -> CartResult<bool> {
    let mut items = self.items.lock();
    let before = items.len();
    items.retain(|item| !(item.cart_id == cart_id && item.product_id == product_id));
    Ok(items.len() != before)
  }

  async fn clear(&self, cart_id: &str) -> CartResult<u64> {
    let mut items = self.items.lock();
    let before = items.len();
    items.retain(|item| item.cart_id != cart_id);
    Ok((before - items.len()) as u64)
  }

  async fn reassign(&self, from_cart_id: &str, to_cart_id: &str) -> CartResult<u64> {
    if from_cart_id == to_cart_id {
      return Ok(0);
    }

    let mut items = self.items.lock();
    let target_quantities: HashMap<i32, i32> = items
      .iter()
      .filter(|item| item.cart_id == to_cart_id)
      .map(|item| (item.product_id, item.quantity))
      .collect();

    // Fold totals are computed up front so an overflow leaves both carts untouched.
    let mut folded: HashMap<i32, i32> = HashMap::new();
    for item in items.iter().filter(|item| item.cart_id == from_cart_id) {
      if let Some(&target) = target_quantities.get(&item.product_id) {
        let current = folded.get(&item.product_id).copied().unwrap_or(target);
        let total = current
          .checked_add(item.quantity)
          .ok_or_else(|| CartError::QuantityOverflow {
            cart_id: to_cart_id.to_string(),
            product_id: item.product_id,
          })?;
        folded.insert(item.product_id, total);
      }
    }

    let mut moved = 0u64;
    items.retain_mut(|item| {
      if item.cart_id != from_cart_id {
        return true;
      }
      moved += 1;
      if folded.contains_key(&item.product_id) {
        false
      } else {
        item.cart_id = to_cart_id.to_string();
        true
      }
    });

    for item in items.iter_mut().filter(|item| item.cart_id == to_cart_id) {
      if let Some(&total) = folded.get(&item.product_id) {
        item.quantity = total;
      }
    }

    Ok(moved)
  }
}
