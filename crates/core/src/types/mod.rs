//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod object_id;
pub mod price;

pub use credential::Password;
pub use email::{Email, EmailError};
pub use id::*;
pub use object_id::{IdError, ObjectId};
pub use price::Price;
