//! Business logic services.
//!
//! # Services
//!
//! - `cart` - Cart Engine: display, add, update, delete, clear
//! - `catalog` - Paged, category-filtered item listing
//! - `orders` - Order recording with best-effort cart clearing
//! - `auth` - Login and signup behind a swappable credential scheme
//!
//! Services borrow the repositories they need for the length of one request
//! and keep no state between requests.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
