// src/lib.rs

//! Wingtip Cart: the shopping cart core of the Wingtip storefront.
//!
//! The crate covers two concerns:
//!  - Cart store access: line-item CRUD (`add_to_cart`, `update_item`, `remove_item`,
//!    `empty_cart`, `bulk_update`) plus the read side (`get_cart_items`, `get_total`,
//!    `get_count`) over any [`CartStore`] implementation.
//!  - Cart identity: deriving the cart identifier of a visitor from an explicit,
//!    request-scoped [`CartContext`] (session + authenticated principal), and migrating
//!    an anonymous cart into the account cart at login.
//!
//! Persistence is pluggable. The crate ships [`MemoryCartStore`]; the storefront binary
//! provides a PostgreSQL implementation.

pub mod cart;
pub mod error;
pub mod identity;
pub mod model;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::cart::{CartSummary, ShoppingCart};
pub use crate::error::{CartError, CartResult};
pub use crate::identity::{CartContext, CartOwner, MemorySession, SessionStore, CART_SESSION_KEY};
pub use crate::model::{CartItem, CartItemUpdate, CartLine, Product};
pub use crate::store::{memory::MemoryCartStore, CartStore};

/*
    Typical request flow:
    1. Build a `CartContext` from the request's session and authenticated principal.
    2. `ctx.cart_id()` yields the cart identifier (stored in the session on first use).
    3. Call `ShoppingCart` operations with that identifier.
    4. On a successful login, call `ShoppingCart::migrate_cart` before any further cart read.
*/
