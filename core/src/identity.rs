// core/src/identity.rs

//! Resolves which cart a visitor owns.
//!
//! The cart identifier lives in the visitor's session under [`CART_SESSION_KEY`]. It is
//! derived once per session: the authenticated username if there is one, otherwise a
//! random UUID. It is never regenerated afterwards; a login that happens while the
//! session holds an anonymous identifier goes through [`migrate_cart`].

use crate::error::{CartError, CartResult};
use crate::store::CartStore;
use std::collections::HashMap;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Session key holding the active cart identifier.
pub const CART_SESSION_KEY: &str = "CartId";

/// Key-value view of the visitor's session.
pub trait SessionStore {
  fn get(&self, key: &str) -> Option<String>;
  fn insert(&mut self, key: &str, value: String);
}

/// A plain map-backed session.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
  values: HashMap<String, String>,
}

impl MemorySession {
  pub fn new() -> Self {
    Self::default()
  }
}

impl SessionStore for MemorySession {
  fn get(&self, key: &str) -> Option<String> {
    self.values.get(key).cloned()
  }

  fn insert(&mut self, key: &str, value: String) {
    self.values.insert(key.to_string(), value);
  }
}

/// Who the session's cart currently belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOwner {
  /// No cart identifier has been assigned yet.
  Unset,
  /// A random identifier issued to an unauthenticated visitor.
  Anonymous(String),
  /// An account's cart, keyed by its username. This need not be the request's current
  /// principal: a shared browser can still point at the previous account.
  Authenticated(String),
}

/// Request-scoped cart identity: the visitor's session plus the authenticated principal,
/// if any. Built by the page handler and passed into every identity operation.
#[derive(Debug, Clone)]
pub struct CartContext<S> {
  session: S,
  principal: Option<String>,
}

impl<S: SessionStore> CartContext<S> {
  /// Blank usernames are treated as unauthenticated.
  pub fn new(session: S, principal: Option<String>) -> Self {
    let principal = principal.filter(|name| !name.trim().is_empty());
    Self { session, principal }
  }

  pub fn principal(&self) -> Option<&str> {
    self.principal.as_deref()
  }

  pub fn is_authenticated(&self) -> bool {
    self.principal.is_some()
  }

  pub fn session(&self) -> &S {
    &self.session
  }

  pub fn into_session(self) -> S {
    self.session
  }

  /// The active cart identifier, assigning one on first use.
  pub fn cart_id(&mut self) -> String {
    if let Some(existing) = self.session.get(CART_SESSION_KEY) {
      return existing;
    }

    let cart_id = match &self.principal {
      Some(name) => name.clone(),
      None => Uuid::new_v4().to_string(),
    };
    debug!(%cart_id, authenticated = self.principal.is_some(), "Assigned session cart identifier.");
    self.session.insert(CART_SESSION_KEY, cart_id.clone());
    cart_id
  }

  /// Points the session at the principal's own cart, leaving stored rows untouched.
  /// Returns the new cart identifier, or `None` when unauthenticated.
  pub fn adopt_principal_cart(&mut self) -> Option<String> {
    let name = self.principal.clone()?;
    self.session.insert(CART_SESSION_KEY, name.clone());
    Some(name)
  }

  /// The identifier the session holds right now, without assigning one.
  pub fn current_cart_id(&self) -> Option<String> {
    self.session.get(CART_SESSION_KEY)
  }

  pub fn owner(&self) -> CartOwner {
    match self.session.get(CART_SESSION_KEY) {
      None => CartOwner::Unset,
      Some(id) if is_generated_cart_id(&id) => CartOwner::Anonymous(id),
      Some(id) => CartOwner::Authenticated(id),
    }
  }
}

// Anonymous identifiers are always v4 UUIDs; usernames never parse as one.
fn is_generated_cart_id(id: &str) -> bool {
  Uuid::parse_str(id).is_ok_and(|uuid| uuid.get_version_num() == 4)
}

/// Moves every row of `anonymous_cart_id` into `username`'s cart, then makes `username` the
/// session's active cart identifier and the context's principal.
///
/// Must run once per login, after authentication succeeds and before the next cart read.
#[instrument(name = "identity::migrate_cart", skip(store, ctx), err(Display))]
pub async fn migrate_cart<S: SessionStore + Send>(
  store: &dyn CartStore,
  ctx: &mut CartContext<S>,
  anonymous_cart_id: &str,
  username: &str,
) -> CartResult<u64> {
  if username.trim().is_empty() {
    return Err(CartError::InvalidCartId(username.to_string()));
  }

  let moved = store.reassign(anonymous_cart_id, username).await?;
  ctx.session.insert(CART_SESSION_KEY, username.to_string());
  ctx.principal = Some(username.to_string());
  info!(moved, "Migrated anonymous cart to account cart.");
  Ok(moved)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_principal_is_anonymous() {
    let ctx = CartContext::new(MemorySession::new(), Some("   ".to_string()));
    assert!(!ctx.is_authenticated());
    assert_eq!(ctx.owner(), CartOwner::Unset);
  }

  #[test]
  fn owner_tracks_session_value() {
    let mut ctx = CartContext::new(MemorySession::new(), None);
    let id = ctx.cart_id();
    assert_eq!(ctx.owner(), CartOwner::Anonymous(id));

    let mut ctx = CartContext::new(MemorySession::new(), Some("alice".to_string()));
    ctx.cart_id();
    assert_eq!(ctx.owner(), CartOwner::Authenticated("alice".to_string()));
  }

  #[test]
  fn username_in_session_is_an_account_cart_whoever_is_signed_in() {
    let mut session = MemorySession::new();
    session.insert(CART_SESSION_KEY, "bob".to_string());

    let signed_out = CartContext::new(session.clone(), None);
    assert_eq!(signed_out.owner(), CartOwner::Authenticated("bob".to_string()));

    let other_user = CartContext::new(session, Some("alice".to_string()));
    assert_eq!(other_user.owner(), CartOwner::Authenticated("bob".to_string()));
  }

  #[test]
  fn only_v4_uuids_count_as_generated() {
    assert!(is_generated_cart_id(&Uuid::new_v4().to_string()));
    assert!(!is_generated_cart_id("alice"));
    assert!(!is_generated_cart_id("00000000-0000-0000-0000-000000000000"));
  }

  #[test]
  fn adopt_principal_cart_overwrites_session_value() {
    let mut session = MemorySession::new();
    session.insert(CART_SESSION_KEY, "bob".to_string());
    let mut ctx = CartContext::new(session, Some("alice".to_string()));

    assert_eq!(ctx.adopt_principal_cart().as_deref(), Some("alice"));
    assert_eq!(ctx.cart_id(), "alice");

    let mut anonymous = CartContext::new(MemorySession::new(), None);
    assert_eq!(anonymous.adopt_principal_cart(), None);
    assert_eq!(anonymous.owner(), CartOwner::Unset);
  }
}
