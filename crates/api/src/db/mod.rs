//! Document store adapter.
//!
//! The API persists four collections (items, users, carts, orders). Each has a
//! repository trait here, implemented by two backends:
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx; one table per collection, nested
//!   sequences stored as `JSONB`
//! - [`MemoryStore`] - process-local collections, for tests and local runs
//!
//! There are no transactions across collections. Every write replaces a
//! whole document, so concurrent read-modify-write cycles on the same
//! document resolve as last write wins.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate
//! ```

pub mod carts;
pub mod items;
pub mod memory;
pub mod orders;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::{CartInsert, CartRepository};
pub use items::{ItemPage, ItemRepository};
pub use memory::MemoryStore;
pub use orders::OrderRepository;
pub use users::UserRepository;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested document was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Store-wide operations that are not tied to one collection.
#[async_trait]
pub trait Store: Send + Sync {
    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed document store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
fn conflict_or_database(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(format!("{what} already exists"));
        }
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
mod tests {
    const ITEMS_MIGRATION: &str = include_str!("../../migrations/20260301000001_create_items.sql");
    const ORDERS_MIGRATION: &str =
        include_str!("../../migrations/20260301000004_create_orders.sql");

    fn column_type<'a>(migration: &'a str, column: &str) -> Option<&'a str> {
        migration.lines().find_map(|line| {
            let mut words = line.split_whitespace();
            if words.next() == Some(column) {
                words.next()
            } else {
                None
            }
        })
    }

    #[test]
    fn test_money_columns_keep_full_precision() {
        // A precision or scale on NUMERIC would round submitted amounts.
        assert_eq!(column_type(ITEMS_MIGRATION, "price"), Some("NUMERIC"));
        assert_eq!(column_type(ORDERS_MIGRATION, "total_price"), Some("NUMERIC"));
    }
}
