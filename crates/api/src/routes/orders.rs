//! Order route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::ErrorKeyed;
use crate::models::Order;
use crate::services::orders::OrderRequest;
use crate::state::AppState;

/// Record an order and clear the user's cart.
///
/// POST /createOrder
///
/// # Errors
///
/// Returns 400 for a malformed user id and 500 if the order cannot be
/// stored, with the reason under `error`.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> Result<Json<Order>, ErrorKeyed> {
    let order = state.order_service().place(request).await?;
    Ok(Json(order))
}
