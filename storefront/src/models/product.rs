// storefront/src/models/product.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub product_id: i32,
  pub product_name: String,
  pub description: String,
  pub image_path: Option<String>,
  pub unit_price: Decimal,
  pub category_id: Option<i32>,
}
