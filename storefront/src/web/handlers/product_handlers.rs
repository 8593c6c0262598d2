// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::errors::AppError;
use crate::models::{Category, Product};
use crate::state::AppState;

const PRODUCT_COLUMNS: &str = "product_id, product_name, description, image_path, unit_price, category_id";

#[instrument(name = "handler::list_category_products", skip(app_state, path), fields(category = %path.as_ref()))]
pub async fn list_category_products_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let category_name = path.into_inner();

  let category: Option<Category> = sqlx::query_as(
    "SELECT category_id, category_name, description FROM categories WHERE LOWER(category_name) = LOWER($1)",
  )
  .bind(&category_name)
  .fetch_optional(&app_state.db_pool)
  .await
  .map_err(|e| {
    error!("Database error while fetching category {}: {}", category_name, e);
    AppError::Sqlx(e)
  })?;

  let Some(category) = category else {
    warn!("Category {} not found.", category_name);
    return Err(AppError::NotFound(format!("Category {} not found.", category_name)));
  };

  let products: Vec<Product> = sqlx::query_as(&format!(
    "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = $1 ORDER BY product_name ASC"
  ))
  .bind(category.category_id)
  .fetch_all(&app_state.db_pool)
  .await
  .map_err(|e| {
    error!("Failed to fetch products for category {}: {}", category.category_name, e);
    AppError::Sqlx(e)
  })?;

  info!("Fetched {} products in category {}.", products.len(), category.category_name);

  Ok(HttpResponse::Ok().json(json!({
      "category": category,
      "products": products
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_name = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_name = path.into_inner();

  let product_opt: Option<Product> = sqlx::query_as(&format!(
    "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_name = $1"
  ))
  .bind(&product_name)
  .fetch_optional(&app_state.db_pool)
  .await
  .map_err(|e| {
    error!("Database error while fetching product {}: {}", product_name, e);
    AppError::Sqlx(e)
  })?;

  match product_opt {
    Some(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
    None => {
      warn!("Product {} not found.", product_name);
      Err(AppError::NotFound(format!("Product {} not found.", product_name)))
    }
  }
}
