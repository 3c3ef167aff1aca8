//! Domain models for the shop.
//!
//! Each model is one document in one of the four store collections. Field
//! names on the wire are camelCase, with the document key serialized as `_id`.

pub mod cart;
pub mod item;
pub mod order;
pub mod user;

pub use cart::{Cart, CartEntry, CartLineView, PopulatedCart, PopulatedEntry};
pub use item::{Item, NewItem};
pub use order::{Order, OrderLine};
pub use user::{NewUser, User};
