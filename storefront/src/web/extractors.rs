// storefront/src/web/extractors.rs

use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::{debug, error};
use wingtip_cart::CartContext;

use crate::errors::AppError;
use crate::session::ServerSession;
use crate::state::AppState;

/// Header set by the upstream identity layer once a visitor has authenticated.
pub const AUTHENTICATED_USER_HEADER: &str = "X-Authenticated-User";

/// The request-scoped cart context: the visitor's server-side session plus the
/// authenticated principal, if any.
#[derive(Debug)]
pub struct CartRequest {
  pub ctx: CartContext<ServerSession>,
  cookie_name: String,
}

impl CartRequest {
  /// A JSON response that also (re)sets the session cookie.
  pub fn respond<T: Serialize>(&self, status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
      .cookie(self.ctx.session().cookie(&self.cookie_name))
      .json(body)
  }
}

impl FromRequest for CartRequest {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
      error!("CartRequest extractor: AppState is not registered with the app.");
      return futures_util::future::ready(Err(AppError::Internal("Application state unavailable.".to_string())));
    };

    let cookie_name = state.config.session_cookie_name.clone();
    let session_id = req.cookie(&cookie_name).map(|c| c.value().to_string());
    let session = state.sessions.open(session_id.as_deref());

    let principal = req
      .headers()
      .get(AUTHENTICATED_USER_HEADER)
      .and_then(|value| value.to_str().ok())
      .map(str::to_string);
    debug!(session_id = %session.id(), new_session = session.is_new(), authenticated = principal.is_some(), "Built cart request context.");

    futures_util::future::ready(Ok(CartRequest {
      ctx: CartContext::new(session, principal),
      cookie_name,
    }))
  }
}
