//! Cart collection.

use async_trait::async_trait;
use sqlx::types::Json;

use bazaar_core::{CartId, UserId};

use super::{PgStore, RepositoryError};
use crate::models::{Cart, CartEntry};

/// Outcome of [`CartRepository::insert_cart_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartInsert {
    /// No cart existed for the user; the given cart was stored.
    Created(Cart),
    /// The user already had a cart; it is returned unchanged.
    Existing(Cart),
}

/// Repository for cart documents.
///
/// Carts are unique per user. Creation goes through
/// [`insert_cart_if_absent`](CartRepository::insert_cart_if_absent) so two
/// concurrent first adds cannot produce two carts.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Get the cart belonging to a user.
    async fn find_cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError>;

    /// Get a cart by its id.
    async fn find_cart(&self, id: CartId) -> Result<Option<Cart>, RepositoryError>;

    /// Store `cart` unless its user already has one, in a single operation.
    async fn insert_cart_if_absent(&self, cart: &Cart) -> Result<CartInsert, RepositoryError>;

    /// Replace a stored cart document.
    ///
    /// Returns `RepositoryError::NotFound` if the cart does not exist.
    async fn save_cart(&self, cart: &Cart) -> Result<(), RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    items: Json<Vec<CartEntry>>,
    ordered: bool,
}

impl From<CartRow> for Cart {
    fn from(r: CartRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            items: r.items.0,
            ordered: r.ordered,
        }
    }
}

#[async_trait]
impl CartRepository for PgStore {
    async fn find_cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, items, ordered
            FROM carts
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Cart::from))
    }

    async fn find_cart(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, items, ordered
            FROM carts
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Cart::from))
    }

    async fn insert_cart_if_absent(&self, cart: &Cart) -> Result<CartInsert, RepositoryError> {
        let inserted = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO carts (id, user_id, items, ordered)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING id, user_id, items, ordered
            ",
        )
        .bind(cart.id)
        .bind(cart.user_id)
        .bind(Json(&cart.items))
        .bind(cart.ordered)
        .fetch_optional(self.pool())
        .await?;

        if let Some(row) = inserted {
            return Ok(CartInsert::Created(row.into()));
        }

        self.find_cart_by_user(cart.user_id)
            .await?
            .map(CartInsert::Existing)
            .ok_or(RepositoryError::NotFound)
    }

    async fn save_cart(&self, cart: &Cart) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE carts
            SET items = $2, ordered = $3, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(cart.id)
        .bind(Json(&cart.items))
        .bind(cart.ordered)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
