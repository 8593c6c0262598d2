// core/src/cart.rs

//! Cart store access: the operations page handlers call once they hold a cart identifier.

use crate::error::{CartError, CartResult};
use crate::identity::{self, CartContext, SessionStore};
use crate::model::{CartItem, CartItemUpdate, CartLine};
use crate::store::CartStore;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Everything the shopping cart page shows, read in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSummary {
  pub cart_id: String,
  pub items: Vec<CartLine>,
  pub total: Decimal,
  pub count: i64,
}

/// Cart operations over a shared `CartStore`.
///
/// Cheap to clone; every mutating call is persisted before it returns.
#[derive(Clone)]
pub struct ShoppingCart {
  store: Arc<dyn CartStore>,
}

impl std::fmt::Debug for ShoppingCart {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ShoppingCart").finish_non_exhaustive()
  }
}

impl ShoppingCart {
  pub fn new(store: Arc<dyn CartStore>) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &Arc<dyn CartStore> {
    &self.store
  }

  /// Adds one unit of a product, creating the line item on first add.
  #[instrument(name = "cart::add_to_cart", skip(self), err(Display))]
  pub async fn add_to_cart(&self, cart_id: &str, product_id: i32) -> CartResult<CartItem> {
    let item = self.store.add_item(cart_id, product_id).await?;
    info!(item_id = %item.item_id, quantity = item.quantity, "Product added to cart.");
    Ok(item)
  }

  pub async fn get_cart_items(&self, cart_id: &str) -> CartResult<Vec<CartLine>> {
    self.store.lines(cart_id).await
  }

  /// Sum of `quantity * unit_price` over the cart; zero for an empty cart.
  pub async fn get_total(&self, cart_id: &str) -> CartResult<Decimal> {
    let lines = self.store.lines(cart_id).await?;
    Ok(total_of(&lines))
  }

  /// Sum of quantities over the cart; zero for an empty cart.
  pub async fn get_count(&self, cart_id: &str) -> CartResult<i64> {
    let lines = self.store.lines(cart_id).await?;
    Ok(count_of(&lines))
  }

  pub async fn cart_summary(&self, cart_id: &str) -> CartResult<CartSummary> {
    let items = self.store.lines(cart_id).await?;
    Ok(CartSummary {
      cart_id: cart_id.to_string(),
      total: total_of(&items),
      count: count_of(&items),
      items,
    })
  }

  /// Sets the quantity of an existing line item. Missing rows are left alone.
  /// A quantity below 1 removes the row.
  #[instrument(name = "cart::update_item", skip(self), err(Display))]
  pub async fn update_item(&self, cart_id: &str, product_id: i32, quantity: i32) -> CartResult<()> {
    if quantity < 1 {
      return self.remove_item(cart_id, product_id).await;
    }
    let found = self
      .store
      .set_quantity(cart_id, product_id, quantity)
      .await
      .map_err(|e| wrap_store_error("Unable to Update Cart Item", e))?;
    if !found {
      debug!("No matching cart item to update.");
    }
    Ok(())
  }

  /// Deletes a line item. Missing rows are left alone.
  #[instrument(name = "cart::remove_item", skip(self), err(Display))]
  pub async fn remove_item(&self, cart_id: &str, product_id: i32) -> CartResult<()> {
    let found = self
      .store
      .remove_item(cart_id, product_id)
      .await
      .map_err(|e| wrap_store_error("Unable to Remove Cart Item", e))?;
    if !found {
      debug!("No matching cart item to remove.");
    }
    Ok(())
  }

  #[instrument(name = "cart::empty_cart", skip(self), err(Display))]
  pub async fn empty_cart(&self, cart_id: &str) -> CartResult<u64> {
    let removed = self.store.clear(cart_id).await?;
    info!(removed, "Cart emptied.");
    Ok(removed)
  }

  /// Applies the shopping cart page's edits: each row whose product has an update is
  /// removed (`remove_item` or a quantity below 1) or set to the purchase quantity.
  /// Updates for products not in the cart are ignored. When one product is listed more
  /// than once, the last entry wins.
  #[instrument(name = "cart::bulk_update", skip(self, updates), fields(updates = updates.len()), err(Display))]
  pub async fn bulk_update(&self, cart_id: &str, updates: &[CartItemUpdate]) -> CartResult<()> {
    let by_product: HashMap<i32, &CartItemUpdate> = updates.iter().map(|u| (u.product_id, u)).collect();

    let result: CartResult<()> = async {
      let lines = self.store.lines(cart_id).await?;
      for line in &lines {
        let Some(update) = by_product.get(&line.item.product_id) else {
          continue;
        };
        if update.removes() {
          self.remove_item(cart_id, line.item.product_id).await?;
        } else {
          self
            .update_item(cart_id, line.item.product_id, update.purchase_quantity)
            .await?;
        }
      }
      Ok::<(), CartError>(())
    }
    .await;

    result.map_err(|e| {
      warn!(error = %e, "Bulk cart update failed.");
      CartError::BulkUpdate { source: Box::new(e) }
    })
  }

  /// Moves the anonymous cart into the account cart at login. See [`identity::migrate_cart`].
  pub async fn migrate_cart<S: SessionStore + Send>(
    &self,
    ctx: &mut CartContext<S>,
    anonymous_cart_id: &str,
    username: &str,
  ) -> CartResult<u64> {
    identity::migrate_cart(self.store.as_ref(), ctx, anonymous_cart_id, username).await
  }
}

fn total_of(lines: &[CartLine]) -> Decimal {
  lines.iter().map(CartLine::line_total).sum()
}

fn count_of(lines: &[CartLine]) -> i64 {
  lines.iter().map(|line| i64::from(line.item.quantity)).sum()
}

// Domain errors pass through untouched; raw store failures get the operation named.
fn wrap_store_error(context: &str, err: CartError) -> CartError {
  match err {
    CartError::Store { context: inner, source } => CartError::Store {
      context: format!("{}: {}", context, inner),
      source,
    },
    other => other,
  }
}
