//! Catalog route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use crate::error::Result;
use crate::models::Item;
use crate::services::catalog::{self, ItemQuery};
use crate::state::AppState;

/// List catalog items.
///
/// GET /items?start&limit&category
///
/// # Errors
///
/// Returns 400 for an invalid category pattern, 500 if the store fails.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Vec<Item>>> {
    let items = catalog::list_items(state.items(), &query).await?;
    Ok(Json(items))
}
