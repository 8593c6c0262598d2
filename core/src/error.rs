// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
  #[error("Product not found: {product_id}")]
  ProductNotFound { product_id: i32 },

  #[error("Invalid cart identifier: {0:?}")]
  InvalidCartId(String),

  /// The resulting quantity would not fit in a cart row.
  #[error("Quantity limit reached for product {product_id} in cart {cart_id}")]
  QuantityOverflow { cart_id: String, product_id: i32 },

  /// A failure reported by the underlying store, with the operation that hit it.
  #[error("{context}. Source: {source}")]
  Store {
    context: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Unable to update cart database. Source: {source}")]
  BulkUpdate {
    #[source]
    source: Box<CartError>,
  },
}

impl CartError {
  /// Wraps a foreign store error with a description of the failed operation.
  pub fn store(context: impl Into<String>, source: impl Into<AnyhowError>) -> Self {
    CartError::Store {
      context: context.into(),
      source: source.into(),
    }
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
