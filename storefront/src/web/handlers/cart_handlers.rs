// storefront/src/web/handlers/cart_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use wingtip_cart::CartItemUpdate;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::CartRequest;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: i32,
}

#[derive(Deserialize, Debug)]
pub struct UpdateCartItemPayload {
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct BulkUpdatePayload {
  pub updates: Vec<CartItemUpdate>,
}

// --- Handler Implementations ---

#[instrument(name = "handler::view_cart", skip(app_state, cart_req))]
pub async fn view_cart_handler(app_state: web::Data<AppState>, mut cart_req: CartRequest) -> Result<HttpResponse, AppError> {
  let cart_id = cart_req.ctx.cart_id();
  let summary = app_state.cart.cart_summary(&cart_id).await?;
  Ok(cart_req.respond(StatusCode::OK, &summary))
}

#[instrument(name = "handler::cart_count", skip(app_state, cart_req))]
pub async fn cart_count_handler(app_state: web::Data<AppState>, mut cart_req: CartRequest) -> Result<HttpResponse, AppError> {
  let cart_id = cart_req.ctx.cart_id();
  let count = app_state.cart.get_count(&cart_id).await?;
  Ok(cart_req.respond(StatusCode::OK, &json!({ "cartId": cart_id, "count": count })))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, cart_req),
    fields(product_id = %req_payload.product_id)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  mut cart_req: CartRequest,
) -> Result<HttpResponse, AppError> {
  let cart_id = cart_req.ctx.cart_id();
  let item = app_state.cart.add_to_cart(&cart_id, req_payload.product_id).await?;

  info!(
    "Product {} in cart {} now at quantity {}.",
    item.product_id, cart_id, item.quantity
  );

  Ok(cart_req.respond(
    StatusCode::OK,
    &json!({
        "message": "Item added to cart successfully.",
        "cartItem": item
    }),
  ))
}

#[instrument(name = "handler::update_cart_item", skip(app_state, path, req_payload, cart_req))]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  req_payload: web::Json<UpdateCartItemPayload>,
  mut cart_req: CartRequest,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let cart_id = cart_req.ctx.cart_id();
  app_state.cart.update_item(&cart_id, product_id, req_payload.quantity).await?;
  let summary = app_state.cart.cart_summary(&cart_id).await?;
  Ok(cart_req.respond(StatusCode::OK, &summary))
}

#[instrument(name = "handler::remove_cart_item", skip(app_state, path, cart_req))]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
  mut cart_req: CartRequest,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let cart_id = cart_req.ctx.cart_id();
  app_state.cart.remove_item(&cart_id, product_id).await?;
  let summary = app_state.cart.cart_summary(&cart_id).await?;
  Ok(cart_req.respond(StatusCode::OK, &summary))
}

#[instrument(
    name = "handler::bulk_update_cart",
    skip(app_state, req_payload, cart_req),
    fields(updates = req_payload.updates.len())
)]
pub async fn bulk_update_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<BulkUpdatePayload>,
  mut cart_req: CartRequest,
) -> Result<HttpResponse, AppError> {
  let cart_id = cart_req.ctx.cart_id();
  app_state.cart.bulk_update(&cart_id, &req_payload.updates).await?;
  let summary = app_state.cart.cart_summary(&cart_id).await?;
  Ok(cart_req.respond(StatusCode::OK, &summary))
}

#[instrument(name = "handler::empty_cart", skip(app_state, cart_req))]
pub async fn empty_cart_handler(app_state: web::Data<AppState>, mut cart_req: CartRequest) -> Result<HttpResponse, AppError> {
  let cart_id = cart_req.ctx.cart_id();
  let removed = app_state.cart.empty_cart(&cart_id).await?;
  Ok(cart_req.respond(
    StatusCode::OK,
    &json!({ "message": "Cart emptied.", "removedItems": removed }),
  ))
}
