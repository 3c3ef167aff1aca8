//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                         - Greeting
//! GET    /health                   - Liveness check
//! GET    /health/ready             - Readiness check (store ping)
//!
//! # Catalog
//! GET    /items?start&limit&category - Paged item listing
//!
//! # Cart
//! GET    /cart/{user_id}           - Cart lines with item details
//! POST   /add-to-cart              - Add one unit of an item
//! PUT    /updateCartItem/{user_id} - Set quantity of an item by name
//! DELETE /deleteCartItem/{user_id} - Remove an item by name
//! DELETE /clearCart/{user_id}      - Empty the cart
//!
//! # Orders
//! POST   /createOrder              - Record an order and clear the cart
//!
//! # Accounts
//! POST   /login                    - Login with email and password
//! POST   /signup                   - Create an account
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod items;
pub mod orders;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart/{user_id}", get(cart::show))
        .route("/add-to-cart", post(cart::add))
        .route("/updateCartItem/{user_id}", put(cart::update))
        .route("/deleteCartItem/{user_id}", delete(cart::remove))
        .route("/clearCart/{user_id}", delete(cart::clear))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::greeting))
        .route("/health", get(home::health))
        .route("/health/ready", get(home::readiness))
        .route("/items", get(items::index))
        .merge(cart_routes())
        .route("/createOrder", post(orders::create))
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
}
