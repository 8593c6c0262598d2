// core/src/model.rs

//! Cart entities shared by every store implementation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line item: a quantity of one product in one cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
  pub item_id: String,
  /// Session-generated identifier for anonymous visitors, username once authenticated.
  pub cart_id: String,
  pub product_id: i32,
  /// Always >= 1 while the row exists.
  pub quantity: i32,
  pub date_created: DateTime<Utc>,
}

impl CartItem {
  /// A fresh line item with quantity 1, a new item id and the current timestamp.
  pub fn new(cart_id: impl Into<String>, product_id: i32) -> Self {
    Self {
      item_id: Uuid::new_v4().to_string(),
      cart_id: cart_id.into(),
      product_id,
      quantity: 1,
      date_created: Utc::now(),
    }
  }
}

/// The read-only slice of a catalog product that the cart needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub product_id: i32,
  pub product_name: String,
  pub unit_price: Decimal,
}

impl Product {
  pub fn new(product_id: i32, product_name: impl Into<String>, unit_price: Decimal) -> Self {
    Self {
      product_id,
      product_name: product_name.into(),
      unit_price,
    }
  }
}

/// A cart row joined with the product it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
  #[serde(flatten)]
  pub item: CartItem,
  pub product_name: String,
  pub unit_price: Decimal,
}

impl CartLine {
  pub fn line_total(&self) -> Decimal {
    Decimal::from(self.item.quantity) * self.unit_price
  }
}

/// One entry of a bulk cart update, as posted by the shopping cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemUpdate {
  pub product_id: i32,
  pub purchase_quantity: i32,
  #[serde(default)]
  pub remove_item: bool,
}

impl CartItemUpdate {
  /// Whether applying this update deletes the row instead of setting its quantity.
  pub fn removes(&self) -> bool {
    self.remove_item || self.purchase_quantity < 1
  }
}
