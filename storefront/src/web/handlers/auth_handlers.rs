// storefront/src/web/handlers/auth_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument, warn};
use wingtip_cart::CartOwner;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{CartRequest, AUTHENTICATED_USER_HEADER};

/// Completes a login. Called by the identity layer right after it authenticates the
/// visitor, before any cart page is rendered for the new identity.
///
/// An anonymous cart held by the session is migrated into the account cart. A session
/// that still points at another account's cart is switched over without moving rows.
#[instrument(name = "handler::signin", skip(app_state, cart_req))]
pub async fn signin_handler(app_state: web::Data<AppState>, mut cart_req: CartRequest) -> Result<HttpResponse, AppError> {
  let Some(username) = cart_req.ctx.principal().map(str::to_string) else {
    warn!("Signin completion without an authenticated principal.");
    return Err(AppError::Auth(format!(
      "Authentication required. Missing {} header.",
      AUTHENTICATED_USER_HEADER
    )));
  };

  let migrated = match cart_req.ctx.owner() {
    CartOwner::Anonymous(previous) => {
      app_state.cart.migrate_cart(&mut cart_req.ctx, &previous, &username).await?
    }
    CartOwner::Authenticated(previous) if previous != username => {
      info!("Session switched from account cart {} to {}.", previous, username);
      cart_req.ctx.adopt_principal_cart();
      0
    }
    CartOwner::Unset | CartOwner::Authenticated(_) => {
      cart_req.ctx.cart_id();
      0
    }
  };

  info!("Signin completed for {}. Migrated {} cart item(s).", username, migrated);

  Ok(cart_req.respond(
    StatusCode::OK,
    &json!({
        "message": "Signin successful.",
        "cartId": username,
        "migratedItems": migrated,
    }),
  ))
}
