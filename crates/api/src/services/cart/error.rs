//! Cart error types.

use thiserror::Error;

use bazaar_core::IdError;

use crate::db::RepositoryError;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The user id is not a well-formed identifier.
    #[error("invalid userId: {0}")]
    InvalidUserId(IdError),

    /// The item id is not a well-formed identifier.
    #[error("invalid itemId: {0}")]
    InvalidItemId(IdError),

    /// The user has no cart.
    #[error("cart not found")]
    CartNotFound,

    /// No cart entry resolves to an item with this name.
    #[error("item {0:?} not found in cart")]
    ItemNotInCart(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
