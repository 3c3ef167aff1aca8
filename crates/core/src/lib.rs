//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `api` - HTTP backend for items, carts, orders and accounts
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Document identifiers, typed entity IDs, prices, emails and passwords

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
