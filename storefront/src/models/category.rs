// storefront/src/models/category.rs

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
  pub category_id: i32,
  pub category_name: String,
  pub description: Option<String>,
}
