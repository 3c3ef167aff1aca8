//! Process-local document store.
//!
//! Holds each collection in insertion order behind one `RwLock` and enforces
//! the same uniqueness rules as the `PostgreSQL` schema (one cart per user,
//! one user per email). Contents are lost when the process exits.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use bazaar_core::{CartId, Email, ItemId, UserId};

use super::{
    CartInsert, CartRepository, ItemPage, ItemRepository, OrderRepository, RepositoryError, Store,
    UserRepository,
};
use crate::models::{Cart, Item, Order, User};

#[derive(Debug, Default)]
struct Collections {
    items: Vec<Item>,
    users: Vec<User>,
    carts: Vec<Cart>,
    orders: Vec<Order>,
}

/// In-memory implementation of every repository trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored carts.
    pub async fn carts(&self) -> Vec<Cart> {
        self.inner.read().await.carts.clone()
    }

    /// Snapshot of all stored orders.
    pub async fn orders(&self) -> Vec<Order> {
        self.inner.read().await.orders.clone()
    }

    /// Snapshot of all stored users.
    pub async fn users(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn find_items(&self, ids: &[ItemId]) -> Result<HashMap<ItemId, Item>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .iter()
            .filter(|i| ids.contains(&i.id))
            .map(|i| (i.id, i.clone()))
            .collect())
    }

    async fn list_items(&self, page: &ItemPage) -> Result<Vec<Item>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(page.select(&inner.items))
    }

    async fn insert_item(&self, item: &Item) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.items.iter().any(|i| i.id == item.id) {
            return Err(RepositoryError::Conflict("item already exists".to_owned()));
        }
        inner.items.push(item.clone());
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| &u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        inner.users.push(user.clone());
        Ok(())
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn find_cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.carts.iter().find(|c| c.user_id == user_id).cloned())
    }

    async fn find_cart(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.carts.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_cart_if_absent(&self, cart: &Cart) -> Result<CartInsert, RepositoryError> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.carts.iter().find(|c| c.user_id == cart.user_id) {
            return Ok(CartInsert::Existing(existing.clone()));
        }
        inner.carts.push(cart.clone());
        Ok(CartInsert::Created(cart.clone()))
    }

    async fn save_cart(&self, cart: &Cart) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .carts
            .iter_mut()
            .find(|c| c.id == cart.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = cart.clone();
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn insert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        self.inner.write().await.orders.push(order.clone());
        Ok(())
    }
}
