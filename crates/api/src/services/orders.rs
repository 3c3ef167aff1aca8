//! Order Recorder.
//!
//! Stores an order snapshot exactly as the client submitted it, then clears
//! the user's cart. The two writes are not atomic: once the order is stored
//! the request succeeds, even if clearing the cart fails.

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use bazaar_core::{IdError, OrderId, Price, UserId};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::{Order, OrderLine};

use super::cart::{CartError, CartService};

/// Errors from recording an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The user id is not a well-formed identifier.
    #[error("invalid userId: {0}")]
    InvalidUserId(IdError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order as submitted by the client.
///
/// Lines and total are taken as given; nothing is checked against the
/// catalog or the cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: String,
    pub items: Vec<OrderLine>,
    pub total_price: Price,
}

/// Order service.
pub struct OrderService<'a> {
    orders: &'a dyn OrderRepository,
    carts: CartService<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(orders: &'a dyn OrderRepository, carts: CartService<'a>) -> Self {
        Self { orders, carts }
    }

    /// Record an order and clear the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidUserId` for a malformed user id and
    /// `OrderError::Repository` if the order cannot be stored. Failing to
    /// clear the cart is logged, not returned.
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn place(&self, request: OrderRequest) -> Result<Order, OrderError> {
        let user_id = UserId::parse(&request.user_id).map_err(OrderError::InvalidUserId)?;

        if lines_total(&request.items) != Some(request.total_price) {
            tracing::info!(total = %request.total_price, "Submitted total differs from line sum");
        }

        let order = Order {
            id: OrderId::generate(),
            user_id,
            items: request.items,
            total_price: request.total_price,
            order_date: Utc::now(),
        };
        self.orders.insert_order(&order).await?;
        tracing::info!(order_id = %order.id, total = %order.total_price, "Order recorded");

        match self.carts.clear(user_id).await {
            Ok(()) => {}
            Err(CartError::CartNotFound) => {
                tracing::debug!("No cart to clear after order");
            }
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "Failed to clear cart after order");
            }
        }

        Ok(order)
    }
}

/// Sum of `price * qty` over all lines, or `None` on overflow.
fn lines_total(lines: &[OrderLine]) -> Option<Price> {
    lines.iter().try_fold(Price::ZERO, |sum, line| {
        let subtotal = line.price.times(line.qty)?;
        sum.amount().checked_add(subtotal.amount()).map(Price::new)
    })
}
