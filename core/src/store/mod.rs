// core/src/store/mod.rs

//! The persistence seam for cart line items.
//!
//! Each method is one atomic primitive: implementations must not interleave another
//! writer between the read and the write of a single call. `ShoppingCart` composes
//! these primitives into the cart operations.

pub mod memory;

use crate::error::CartResult;
use crate::model::{CartItem, CartLine};
use async_trait::async_trait;

#[async_trait]
pub trait CartStore: Send + Sync {
  /// Inserts a line item with quantity 1, or increments the quantity of the existing
  /// (cart_id, product_id) row. Fails with `CartError::ProductNotFound` when the product
  /// does not exist.
  async fn add_item(&self, cart_id: &str, product_id: i32) -> CartResult<CartItem>;

  /// All rows of a cart joined with their products, in creation order.
  async fn lines(&self, cart_id: &str) -> CartResult<Vec<CartLine>>;

  /// Sets the quantity of an existing row. Returns `false` when there is no such row.
  /// Callers never pass a quantity below 1.
  async fn set_quantity(&self, cart_id: &str, product_id: i32, quantity: i32) -> CartResult<bool>;

  /// Deletes the (cart_id, product_id) row. Returns `false` when there is no such row.
  async fn remove_item(&self, cart_id: &str, product_id: i32) -> CartResult<bool>;

  /// Deletes every row of a cart, returning how many were removed.
  async fn clear(&self, cart_id: &str) -> CartResult<u64>;

  /// Re-owns every row of `from_cart_id` under `to_cart_id`, returning how many rows moved.
  ///
  /// A row whose product is already in the target cart is folded into that row
  /// (quantities summed) and deleted; every other row is rewritten in place.
  async fn reassign(&self, from_cart_id: &str, to_cart_id: &str) -> CartResult<u64>;
}
