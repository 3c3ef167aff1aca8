//! Cart route handlers.
//!
//! Carts are keyed by user id, taken from the path or the request body. The
//! cart is created on the first add; every other mutation needs it to exist.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ErrorKeyed, Result, add_breadcrumb};
use crate::models::CartLineView;
use crate::services::cart::{AddOutcome, parse_item_id, parse_user_id};
use crate::state::AppState;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub user_id: String,
    pub item_id: String,
}

/// Update cart item request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub item_name: String,
    pub qty: i64,
}

/// Delete cart item request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCartItemRequest {
    pub item_name: String,
}

/// Confirmation body for cart mutations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Show the user's cart.
///
/// GET /cart/{user_id}
///
/// A user without a cart gets an empty list.
///
/// # Errors
///
/// Returns 400 for a malformed user id, 500 if the store fails.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<CartLineView>>> {
    let user_id = parse_user_id(&user_id)?;
    let lines = state.cart_service().lines(user_id).await?;
    Ok(Json(lines))
}

/// Add one unit of an item.
///
/// POST /add-to-cart
///
/// Responds 201 with the new cart when this created it, otherwise 200 with
/// the updated cart, item details resolved.
///
/// # Errors
///
/// Returns 400 for malformed ids, 500 if the store fails.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Response> {
    let user_id = parse_user_id(&request.user_id)?;
    let item_id = parse_item_id(&request.item_id)?;

    add_breadcrumb(
        "cart",
        "Added item to cart",
        Some(&[("item_id", request.item_id.as_str())]),
    );

    let response = match state.cart_service().add_item(user_id, item_id).await? {
        AddOutcome::Created(cart) => (StatusCode::CREATED, Json(cart)).into_response(),
        AddOutcome::Updated(cart) => Json(cart).into_response(),
    };
    Ok(response)
}

/// Set the quantity of an item, found by name.
///
/// PUT /updateCartItem/{user_id}
///
/// # Errors
///
/// Returns 404 if there is no cart or no matching item, with the reason
/// under `error`.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateCartItemRequest>,
) -> std::result::Result<Json<MessageResponse>, ErrorKeyed> {
    let user_id = parse_user_id(&user_id)?;
    state
        .cart_service()
        .update_quantity(user_id, &request.item_name, request.qty)
        .await?;

    Ok(MessageResponse::new("Item quantity updated successfully"))
}

/// Remove an item, found by name.
///
/// DELETE /deleteCartItem/{user_id}
///
/// # Errors
///
/// Returns 404 if there is no cart or no matching item, with the reason
/// under `error`.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<DeleteCartItemRequest>,
) -> std::result::Result<Json<MessageResponse>, ErrorKeyed> {
    let user_id = parse_user_id(&user_id)?;
    state
        .cart_service()
        .remove_item(user_id, &request.item_name)
        .await?;

    Ok(MessageResponse::new(format!(
        "Item \"{}\" deleted successfully",
        request.item_name
    )))
}

/// Empty the user's cart.
///
/// DELETE /clearCart/{user_id}
///
/// # Errors
///
/// Returns 404 if the user has no cart.
#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let user_id = parse_user_id(&user_id)?;
    state.cart_service().clear(user_id).await?;

    Ok(MessageResponse::new("Cart cleared successfully"))
}
