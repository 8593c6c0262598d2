// storefront/src/web/routes.rs

use actix_web::web;

use crate::errors::AppError;
use crate::web::handlers::{auth_handlers, cart_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  // Malformed bodies and path segments answer with the same JSON error shape as handlers.
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()))
    .app_data(web::PathConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()));

  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // Catalog pages
      .route(
        "/category/{category_name}",
        web::get().to(product_handlers::list_category_products_handler),
      )
      .route(
        "/product/{product_name}",
        web::get().to(product_handlers::get_product_handler),
      )
      // Login completion: migrates the anonymous cart
      .service(web::scope("/auth").route("/signin", web::post().to(auth_handlers::signin_handler)))
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::view_cart_handler))
          .route("", web::delete().to(cart_handlers::empty_cart_handler))
          .route("/count", web::get().to(cart_handlers::cart_count_handler))
          .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route(
            "/items/{product_id}",
            web::put().to(cart_handlers::update_cart_item_handler),
          )
          .route(
            "/items/{product_id}",
            web::delete().to(cart_handlers::remove_cart_item_handler),
          )
          .route("/update", web::post().to(cart_handlers::bulk_update_cart_handler)),
      ),
  );
}
