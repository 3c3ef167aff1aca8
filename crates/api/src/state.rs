//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::{CartRepository, ItemRepository, OrderRepository, Store, UserRepository};
use crate::services::auth::{AuthService, CredentialScheme, PlaintextScheme};
use crate::services::cart::CartService;
use crate::services::orders::OrderService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// document store (one handle per collection).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn Store>,
    items: Arc<dyn ItemRepository>,
    users: Arc<dyn UserRepository>,
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderRepository>,
    credentials: Arc<dyn CredentialScheme>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `store` backs every collection.
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: Store + ItemRepository + UserRepository + CartRepository + OrderRepository + 'static,
    {
        Self::with_credentials(store, Arc::new(PlaintextScheme))
    }

    /// Create a new application state with a specific credential scheme.
    pub fn with_credentials<S>(store: Arc<S>, credentials: Arc<dyn CredentialScheme>) -> Self
    where
        S: Store + ItemRepository + UserRepository + CartRepository + OrderRepository + 'static,
    {
        Self {
            inner: Arc::new(AppStateInner {
                store: store.clone(),
                items: store.clone(),
                users: store.clone(),
                carts: store.clone(),
                orders: store,
                credentials,
            }),
        }
    }

    /// Get the store for health checks.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get the item collection.
    #[must_use]
    pub fn items(&self) -> &dyn ItemRepository {
        self.inner.items.as_ref()
    }

    /// Cart service for one request.
    #[must_use]
    pub fn cart_service(&self) -> CartService<'_> {
        CartService::new(self.inner.carts.as_ref(), self.inner.items.as_ref())
    }

    /// Order service for one request.
    #[must_use]
    pub fn order_service(&self) -> OrderService<'_> {
        OrderService::new(self.inner.orders.as_ref(), self.cart_service())
    }

    /// Auth service for one request.
    #[must_use]
    pub fn auth_service(&self) -> AuthService<'_> {
        AuthService::new(self.inner.users.as_ref(), self.inner.credentials.as_ref())
    }
}
