// storefront/src/db/cart_store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;
use wingtip_cart::{CartError, CartItem, CartLine, CartResult, CartStore};

const CART_ITEM_COLUMNS: &str = "item_id, cart_id, product_id, quantity, date_created";

#[derive(Debug, FromRow)]
struct CartItemRow {
  item_id: String,
  cart_id: String,
  product_id: i32,
  quantity: i32,
  date_created: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
  fn from(row: CartItemRow) -> Self {
    CartItem {
      item_id: row.item_id,
      cart_id: row.cart_id,
      product_id: row.product_id,
      quantity: row.quantity,
      date_created: row.date_created,
    }
  }
}

#[derive(Debug, FromRow)]
struct CartLineRow {
  #[sqlx(flatten)]
  item: CartItemRow,
  product_name: String,
  unit_price: Decimal,
}

fn store_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> CartError {
  move |e| CartError::store(context, e)
}

// SQLSTATE 22003: numeric_value_out_of_range.
fn is_out_of_range(e: &sqlx::Error) -> bool {
  e.as_database_error()
    .and_then(|db| db.code())
    .is_some_and(|code| code == "22003")
}

/// `CartStore` over the `cart_items` table.
///
/// Each primitive is one statement (migration: one transaction), so concurrent requests on
/// the same cart cannot lose an increment.
#[derive(Debug, Clone)]
pub struct PgCartStore {
  pool: PgPool,
}

impl PgCartStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CartStore for PgCartStore {
  #[instrument(name = "pg_cart_store::add_item", skip(self), err(Display))]
  async fn add_item(&self, cart_id: &str, product_id: i32) -> CartResult<CartItem> {
    // The SELECT yields no row for an unknown product, so nothing is inserted.
    let sql = format!(
      "INSERT INTO cart_items ({CART_ITEM_COLUMNS})
       SELECT $1, $2, p.product_id, 1, $3 FROM products p WHERE p.product_id = $4
       ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = cart_items.quantity + 1
       RETURNING {CART_ITEM_COLUMNS}"
    );
    let row: Option<CartItemRow> = sqlx::query_as(&sql)
      .bind(Uuid::new_v4().to_string())
      .bind(cart_id)
      .bind(Utc::now())
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| {
        if is_out_of_range(&e) {
          CartError::QuantityOverflow {
            cart_id: cart_id.to_string(),
            product_id,
          }
        } else {
          CartError::store("cart_items upsert", e)
        }
      })?;

    match row {
      Some(row) => Ok(row.into()),
      None => Err(CartError::ProductNotFound { product_id }),
    }
  }

  #[instrument(name = "pg_cart_store::lines", skip(self), err(Display))]
  async fn lines(&self, cart_id: &str) -> CartResult<Vec<CartLine>> {
    let rows: Vec<CartLineRow> = sqlx::query_as(
      "SELECT c.item_id, c.cart_id, c.product_id, c.quantity, c.date_created, p.product_name, p.unit_price
       FROM cart_items c
       JOIN products p ON p.product_id = c.product_id
       WHERE c.cart_id = $1
       ORDER BY c.date_created, c.item_id",
    )
    .bind(cart_id)
    .fetch_all(&self.pool)
    .await
    .map_err(store_err("cart_items select"))?;

    debug!(rows = rows.len(), "Fetched cart lines.");
    Ok(
      rows
        .into_iter()
        .map(|row| CartLine {
          item: row.item.into(),
          product_name: row.product_name,
          unit_price: row.unit_price,
        })
        .collect(),
    )
  }

  #[instrument(name = "pg_cart_store::set_quantity", skip(self), err(Display))]
  async fn set_quantity(&self, cart_id: &str, product_id: i32, quantity: i32) -> CartResult<bool> {
    let result = sqlx::query("UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND product_id = $2")
      .bind(cart_id)
      .bind(product_id)
      .bind(quantity)
      .execute(&self.pool)
      .await
      .map_err(store_err("cart_items update"))?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "pg_cart_store::remove_item", skip(self), err(Display))]
  async fn remove_item(&self, cart_id: &str, product_id: i32) -> CartResult<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
      .bind(cart_id)
      .bind(product_id)
      .execute(&self.pool)
      .await
      .map_err(store_err("cart_items delete"))?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "pg_cart_store::clear", skip(self), err(Display))]
  async fn clear(&self, cart_id: &str) -> CartResult<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
      .bind(cart_id)
      .execute(&self.pool)
      .await
      .map_err(store_err("cart_items delete by cart"))?;
    Ok(result.rows_affected())
  }

  #[instrument(name = "pg_cart_store::reassign", skip(self), err(Display))]
  async fn reassign(&self, from_cart_id: &str, to_cart_id: &str) -> CartResult<u64> {
    if from_cart_id == to_cart_id {
      return Ok(0);
    }

    let context = "cart_items reassign";
    // Dropping the transaction on an early return rolls it back.
    let mut tx = self.pool.begin().await.map_err(store_err(context))?;

    let moved: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE cart_id = $1")
      .bind(from_cart_id)
      .fetch_one(&mut *tx)
      .await
      .map_err(store_err(context))?;

    let overflowing: Option<i32> = sqlx::query_scalar(
      "SELECT target.product_id FROM cart_items AS target
       JOIN cart_items AS source ON source.product_id = target.product_id
       WHERE source.cart_id = $1 AND target.cart_id = $2
         AND target.quantity::bigint + source.quantity > 2147483647
       LIMIT 1",
    )
    .bind(from_cart_id)
    .bind(to_cart_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(store_err(context))?;
    if let Some(product_id) = overflowing {
      return Err(CartError::QuantityOverflow {
        cart_id: to_cart_id.to_string(),
        product_id,
      });
    }

    sqlx::query(
      "UPDATE cart_items AS target SET quantity = target.quantity + source.quantity
       FROM cart_items AS source
       WHERE source.cart_id = $1 AND target.cart_id = $2 AND source.product_id = target.product_id",
    )
    .bind(from_cart_id)
    .bind(to_cart_id)
    .execute(&mut *tx)
    .await
    .map_err(store_err(context))?;

    sqlx::query(
      "DELETE FROM cart_items AS source USING cart_items AS target
       WHERE source.cart_id = $1 AND target.cart_id = $2 AND source.product_id = target.product_id",
    )
    .bind(from_cart_id)
    .bind(to_cart_id)
    .execute(&mut *tx)
    .await
    .map_err(store_err(context))?;

    sqlx::query("UPDATE cart_items SET cart_id = $2 WHERE cart_id = $1")
      .bind(from_cart_id)
      .bind(to_cart_id)
      .execute(&mut *tx)
      .await
      .map_err(store_err(context))?;

    tx.commit().await.map_err(store_err(context))?;
    Ok(moved as u64)
  }
}
