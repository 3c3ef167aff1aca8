//! Integration tests for Bazaar.
//!
//! Tests drive the real router in-process over an in-memory store, so no
//! server or database has to be running.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart` - Cart Engine endpoints
//! - `catalog` - Item listing
//! - `orders` - Order recording
//! - `accounts` - Login and signup
//! - `service` - Greeting, health and routing behaviour

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;

use bazaar_api::db::{ItemRepository, MemoryStore};
use bazaar_api::models::Item;
use bazaar_api::state::AppState;
use bazaar_core::{ItemId, Price};

/// An application instance backed by its own empty store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    app: NormalizePath<Router>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    /// The body as text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestApp {
    /// Create an app over a fresh in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone());

        Self {
            store,
            app: bazaar_api::build_service(state),
        }
    }

    /// Insert a catalog item.
    ///
    /// # Panics
    ///
    /// Panics if the store rejects the item.
    pub async fn stock(&self, name: &str, cents: i64, category: &str) -> Item {
        let item = Item {
            id: ItemId::generate(),
            name: name.to_string(),
            price: Price::from_cents(cents),
            category: category.to_string(),
            photo: format!("/img/{}.jpg", name.to_lowercase()),
        };
        self.store
            .insert_item(&item)
            .await
            .expect("failed to stock item");
        item
    }

    /// Send a request with an optional JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET` a path.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    /// `POST` a JSON body.
    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// `PUT` a JSON body.
    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    /// `DELETE` with an optional JSON body.
    pub async fn delete(&self, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(Method::DELETE, uri, body).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
