//! Cart Engine.
//!
//! Owns every read and mutation of a user's cart: lazy creation on the first
//! add, quantity merge, lookup by item name, population of item details and
//! clearing.
//!
//! # Consistency
//!
//! Mutations are read-modify-write cycles that replace the whole cart
//! document. There is no version check, so two concurrent mutations of the
//! same cart can lose an update (last write wins). Cart creation is the
//! exception: it goes through an atomic insert-if-absent, so a user never ends
//! up with two carts.
//!
//! Update and delete address entries by the resolved item *name*, not by item
//! id. Renaming an item in the catalog therefore changes which requests match.

mod error;

pub use error::CartError;

use tracing::instrument;

use bazaar_core::{ItemId, UserId};

use crate::db::{CartInsert, CartRepository, ItemRepository};
use crate::models::{Cart, CartLineView, PopulatedCart};

/// Parse a user id supplied by a caller.
///
/// # Errors
///
/// Returns `CartError::InvalidUserId` if `raw` is not a well-formed identifier.
pub fn parse_user_id(raw: &str) -> Result<UserId, CartError> {
    UserId::parse(raw).map_err(CartError::InvalidUserId)
}

/// Parse an item id supplied by a caller.
///
/// # Errors
///
/// Returns `CartError::InvalidItemId` if `raw` is not a well-formed identifier.
pub fn parse_item_id(raw: &str) -> Result<ItemId, CartError> {
    ItemId::parse(raw).map_err(CartError::InvalidItemId)
}

/// Result of adding an item to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The user had no cart; a new one was created holding the item.
    Created(Cart),
    /// The item was merged into the existing cart, returned populated.
    Updated(PopulatedCart),
}

/// Cart service.
pub struct CartService<'a> {
    carts: &'a dyn CartRepository,
    items: &'a dyn ItemRepository,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(carts: &'a dyn CartRepository, items: &'a dyn ItemRepository) -> Self {
        Self { carts, items }
    }

    /// Get the user's cart as display lines, in cart order.
    ///
    /// A user without a cart gets an empty list. Entries whose item no longer
    /// exists are left out.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the store fails.
    #[instrument(skip(self))]
    pub async fn lines(&self, user_id: UserId) -> Result<Vec<CartLineView>, CartError> {
        let Some(cart) = self.carts.find_cart_by_user(user_id).await? else {
            return Ok(Vec::new());
        };

        let catalog = self.items.find_items(&cart.item_ids()).await?;
        Ok(cart.lines(&catalog))
    }

    /// Add one unit of an item to the user's cart.
    ///
    /// Creates the cart if the user has none. Otherwise increments the
    /// matching entry or appends a new one, then re-reads the stored cart with
    /// item details resolved. The item id is not checked against the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the cart disappears between the
    /// write and the re-read, `CartError::Repository` if the store fails.
    #[instrument(skip(self))]
    pub async fn add_item(&self, user_id: UserId, item_id: ItemId) -> Result<AddOutcome, CartError> {
        let mut cart = match self.carts.find_cart_by_user(user_id).await? {
            Some(cart) => cart,
            None => {
                let fresh = Cart::with_first_item(user_id, item_id);
                match self.carts.insert_cart_if_absent(&fresh).await? {
                    CartInsert::Created(cart) => {
                        tracing::info!(cart_id = %cart.id, "Created cart");
                        return Ok(AddOutcome::Created(cart));
                    }
                    // Another request created the cart first; merge into it.
                    CartInsert::Existing(cart) => cart,
                }
            }
        };

        cart.add_one(item_id);
        self.carts.save_cart(&cart).await?;

        let stored = self
            .carts
            .find_cart(cart.id)
            .await?
            .ok_or(CartError::CartNotFound)?;
        let catalog = self.items.find_items(&stored.item_ids()).await?;

        Ok(AddOutcome::Updated(stored.populate(&catalog)))
    }

    /// Overwrite the quantity of the entry whose item is named `item_name`.
    ///
    /// `qty` is stored as given, including zero or negative values.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the user has no cart,
    /// `CartError::ItemNotInCart` if no entry resolves to `item_name`.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        item_name: &str,
        qty: i64,
    ) -> Result<(), CartError> {
        let mut cart = self.cart_for(user_id).await?;
        let index = self.entry_index(&cart, item_name).await?;

        if let Some(entry) = cart.items.get_mut(index) {
            entry.qty = qty;
        }
        self.carts.save_cart(&cart).await?;

        tracing::debug!(cart_id = %cart.id, qty, "Updated cart quantity");
        Ok(())
    }

    /// Remove the first entry whose item is named `item_name`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the user has no cart,
    /// `CartError::ItemNotInCart` if no entry resolves to `item_name`.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: UserId, item_name: &str) -> Result<(), CartError> {
        let mut cart = self.cart_for(user_id).await?;
        let index = self.entry_index(&cart, item_name).await?;

        cart.items.remove(index);
        self.carts.save_cart(&cart).await?;

        tracing::debug!(cart_id = %cart.id, "Removed cart entry");
        Ok(())
    }

    /// Empty the user's cart and reset its ordered flag.
    ///
    /// Clearing an already empty cart succeeds.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the user has no cart.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: UserId) -> Result<(), CartError> {
        let mut cart = self.cart_for(user_id).await?;

        cart.clear();
        self.carts.save_cart(&cart).await?;

        tracing::debug!(cart_id = %cart.id, "Cleared cart");
        Ok(())
    }

    async fn cart_for(&self, user_id: UserId) -> Result<Cart, CartError> {
        self.carts
            .find_cart_by_user(user_id)
            .await?
            .ok_or(CartError::CartNotFound)
    }

    async fn entry_index(&self, cart: &Cart, item_name: &str) -> Result<usize, CartError> {
        let catalog = self.items.find_items(&cart.item_ids()).await?;
        cart.position_by_name(&catalog, item_name)
            .ok_or_else(|| CartError::ItemNotInCart(item_name.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use bazaar_core::Price;

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{CartEntry, Item};

    async fn stock(store: &MemoryStore, name: &str, cents: i64) -> Item {
        let item = Item {
            id: ItemId::generate(),
            name: name.to_string(),
            price: Price::from_cents(cents),
            category: "kitchen".to_string(),
            photo: format!("/img/{name}.jpg"),
        };
        store.insert_item(&item).await.unwrap();
        item
    }

    fn service(store: &MemoryStore) -> CartService<'_> {
        CartService::new(store, store)
    }

    async fn stored_cart(store: &MemoryStore, user_id: UserId) -> Cart {
        store.find_cart_by_user(user_id).await.unwrap().unwrap()
    }

    #[test]
    fn test_parse_ids() {
        assert!(parse_user_id("65a1f0c2e4b0a1b2c3d4e5f6").is_ok());
        assert!(matches!(
            parse_user_id("bogus"),
            Err(CartError::InvalidUserId(_))
        ));
        assert!(matches!(
            parse_item_id("I1"),
            Err(CartError::InvalidItemId(_))
        ));
    }

    #[tokio::test]
    async fn test_lines_without_cart_is_empty() {
        let store = MemoryStore::new();
        let lines = service(&store).lines(UserId::generate()).await.unwrap();
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn test_first_add_creates_single_cart() {
        let store = MemoryStore::new();
        let mug = stock(&store, "Mug", 500).await;
        let user_id = UserId::generate();

        let outcome = service(&store).add_item(user_id, mug.id).await.unwrap();

        let AddOutcome::Created(cart) = outcome else {
            panic!("expected a new cart");
        };
        assert_eq!(cart.user_id, user_id);
        assert_eq!(cart.items, vec![CartEntry { item_id: mug.id, qty: 1 }]);
        assert!(!cart.ordered);
        assert_eq!(store.carts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_repeat_add_increments_without_duplicating() {
        let store = MemoryStore::new();
        let mug = stock(&store, "Mug", 500).await;
        let user_id = UserId::generate();
        let carts = service(&store);

        carts.add_item(user_id, mug.id).await.unwrap();
        let outcome = carts.add_item(user_id, mug.id).await.unwrap();

        let AddOutcome::Updated(populated) = outcome else {
            panic!("expected the existing cart");
        };
        assert_eq!(populated.items.len(), 1);
        assert_eq!(populated.items[0].qty, 2);
        assert_eq!(populated.items[0].item.name, "Mug");
        assert_eq!(store.carts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_appends_other_items_in_order() {
        let store = MemoryStore::new();
        let mug = stock(&store, "Mug", 500).await;
        let plate = stock(&store, "Plate", 300).await;
        let user_id = UserId::generate();
        let carts = service(&store);

        carts.add_item(user_id, mug.id).await.unwrap();
        carts.add_item(user_id, plate.id).await.unwrap();
        carts.add_item(user_id, mug.id).await.unwrap();

        let cart = stored_cart(&store, user_id).await;
        assert_eq!(
            cart.items,
            vec![
                CartEntry { item_id: mug.id, qty: 2 },
                CartEntry { item_id: plate.id, qty: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_add_unknown_item_is_stored_but_not_populated() {
        let store = MemoryStore::new();
        let mug = stock(&store, "Mug", 500).await;
        let user_id = UserId::generate();
        let carts = service(&store);

        carts.add_item(user_id, mug.id).await.unwrap();
        let ghost = ItemId::generate();
        let AddOutcome::Updated(populated) = carts.add_item(user_id, ghost).await.unwrap() else {
            panic!("expected the existing cart");
        };

        assert_eq!(populated.items.len(), 1);
        assert_eq!(stored_cart(&store, user_id).await.items.len(), 2);
    }

    #[tokio::test]
    async fn test_mug_walkthrough() {
        let store = MemoryStore::new();
        let mug = stock(&store, "Mug", 500).await;
        let user_id = UserId::generate();
        let carts = service(&store);

        carts.add_item(user_id, mug.id).await.unwrap();
        carts.add_item(user_id, mug.id).await.unwrap();

        carts.update_quantity(user_id, "Mug", 5).await.unwrap();
        assert_eq!(stored_cart(&store, user_id).await.items[0].qty, 5);

        carts.remove_item(user_id, "Mug").await.unwrap();
        assert!(carts.lines(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_accepts_non_positive_quantities() {
        let store = MemoryStore::new();
        let mug = stock(&store, "Mug", 500).await;
        let user_id = UserId::generate();
        let carts = service(&store);
        carts.add_item(user_id, mug.id).await.unwrap();

        carts.update_quantity(user_id, "Mug", 0).await.unwrap();
        assert_eq!(stored_cart(&store, user_id).await.items[0].qty, 0);

        carts.update_quantity(user_id, "Mug", -3).await.unwrap();
        assert_eq!(stored_cart(&store, user_id).await.items[0].qty, -3);
    }

    #[tokio::test]
    async fn test_update_and_remove_unknown_name_leave_cart_unchanged() {
        let store = MemoryStore::new();
        let mug = stock(&store, "Mug", 500).await;
        let user_id = UserId::generate();
        let carts = service(&store);
        carts.add_item(user_id, mug.id).await.unwrap();
        let before = stored_cart(&store, user_id).await;

        assert!(matches!(
            carts.update_quantity(user_id, "Plate", 4).await,
            Err(CartError::ItemNotInCart(name)) if name == "Plate"
        ));
        assert!(matches!(
            carts.remove_item(user_id, "mug").await,
            Err(CartError::ItemNotInCart(_))
        ));

        assert_eq!(stored_cart(&store, user_id).await, before);
    }

    #[tokio::test]
    async fn test_mutations_without_cart_are_not_found() {
        let store = MemoryStore::new();
        let carts = service(&store);
        let user_id = UserId::generate();

        assert!(matches!(
            carts.update_quantity(user_id, "Mug", 1).await,
            Err(CartError::CartNotFound)
        ));
        assert!(matches!(
            carts.remove_item(user_id, "Mug").await,
            Err(CartError::CartNotFound)
        ));
        assert!(matches!(
            carts.clear(user_id).await,
            Err(CartError::CartNotFound)
        ));
    }

    #[tokio::test]
    async fn test_remove_takes_first_match_only() {
        let store = MemoryStore::new();
        let mug = stock(&store, "Mug", 500).await;
        let twin = stock(&store, "Mug", 700).await;
        let user_id = UserId::generate();
        let carts = service(&store);
        carts.add_item(user_id, mug.id).await.unwrap();
        carts.add_item(user_id, twin.id).await.unwrap();

        carts.remove_item(user_id, "Mug").await.unwrap();

        let cart = stored_cart(&store, user_id).await;
        assert_eq!(cart.items, vec![CartEntry { item_id: twin.id, qty: 1 }]);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = MemoryStore::new();
        let mug = stock(&store, "Mug", 500).await;
        let user_id = UserId::generate();
        let carts = service(&store);
        carts.add_item(user_id, mug.id).await.unwrap();

        let mut cart = stored_cart(&store, user_id).await;
        cart.ordered = true;
        store.save_cart(&cart).await.unwrap();

        carts.clear(user_id).await.unwrap();
        carts.clear(user_id).await.unwrap();

        let cart = stored_cart(&store, user_id).await;
        assert!(cart.items.is_empty());
        assert!(!cart.ordered);
    }

    #[tokio::test]
    async fn test_lines_drop_dangling_entries() {
        let store = MemoryStore::new();
        let mug = stock(&store, "Mug", 500).await;
        let user_id = UserId::generate();
        let carts = service(&store);
        carts.add_item(user_id, ItemId::generate()).await.unwrap();
        carts.add_item(user_id, mug.id).await.unwrap();

        let lines = carts.lines(user_id).await.unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "Mug");
        assert_eq!(lines[0].price, Price::from_cents(500));
        assert_eq!(lines[0].photo, "/img/Mug.jpg");
    }
}
