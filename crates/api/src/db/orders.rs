//! Order collection.

use async_trait::async_trait;
use sqlx::types::Json;

use super::{PgStore, RepositoryError};
use crate::models::Order;

/// Repository for order documents. Orders are written once and never updated.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new order.
    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError>;
}

#[async_trait]
impl OrderRepository for PgStore {
    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO orders (id, user_id, items, total_price, order_date)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(Json(&order.items))
        .bind(order.total_price)
        .bind(order.order_date)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
