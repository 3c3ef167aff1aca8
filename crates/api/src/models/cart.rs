//! Cart documents and their populated views.
//!
//! A [`Cart`] stores item references only. Display needs the referenced
//! items' details, so reads resolve each entry against the catalog:
//!
//! - [`PopulatedCart`] mirrors the stored document with every `itemId`
//!   replaced by the item it points at (the add-to-cart response).
//! - [`CartLineView`] is the flat per-line shape returned by `GET /cart`.
//!
//! Entries whose item no longer exists are dropped from both views. They stay
//! in the stored document untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use bazaar_core::{CartId, ItemId, Price, UserId};

use super::Item;

/// A user's shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartEntry>,
    pub ordered: bool,
}

/// One cart line: an item reference and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub item_id: ItemId,
    pub qty: i64,
}

impl Cart {
    /// A fresh cart holding one unit of `item_id`.
    #[must_use]
    pub fn with_first_item(user_id: UserId, item_id: ItemId) -> Self {
        Self {
            id: CartId::generate(),
            user_id,
            items: vec![CartEntry { item_id, qty: 1 }],
            ordered: false,
        }
    }

    /// Add one unit of `item_id`, merging with an existing entry for it.
    ///
    /// Quantities are set freely by updates, so the increment saturates at
    /// `i64::MAX`.
    pub fn add_one(&mut self, item_id: ItemId) {
        match self.items.iter_mut().find(|entry| entry.item_id == item_id) {
            Some(entry) => entry.qty = entry.qty.saturating_add(1),
            None => self.items.push(CartEntry { item_id, qty: 1 }),
        }
    }

    /// Index of the first entry whose resolved item is named `name`.
    ///
    /// Entries with dangling references never match.
    #[must_use]
    pub fn position_by_name(&self, catalog: &HashMap<ItemId, Item>, name: &str) -> Option<usize> {
        self.items.iter().position(|entry| {
            catalog
                .get(&entry.item_id)
                .is_some_and(|item| item.name == name)
        })
    }

    /// Empty the cart and reset the ordered flag.
    pub fn clear(&mut self) {
        self.items.clear();
        self.ordered = false;
    }

    /// Distinct item ids referenced by the cart, in cart order.
    #[must_use]
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = Vec::with_capacity(self.items.len());
        for entry in &self.items {
            if !ids.contains(&entry.item_id) {
                ids.push(entry.item_id);
            }
        }
        ids
    }

    /// Resolve entries into display lines, dropping dangling references.
    #[must_use]
    pub fn lines(&self, catalog: &HashMap<ItemId, Item>) -> Vec<CartLineView> {
        self.items
            .iter()
            .filter_map(|entry| {
                catalog.get(&entry.item_id).map(|item| CartLineView {
                    item_id: item.id,
                    name: item.name.clone(),
                    price: item.price,
                    category: item.category.clone(),
                    photo: item.photo.clone(),
                    qty: entry.qty,
                })
            })
            .collect()
    }

    /// Resolve the whole document, dropping dangling references.
    #[must_use]
    pub fn populate(&self, catalog: &HashMap<ItemId, Item>) -> PopulatedCart {
        PopulatedCart {
            id: self.id,
            user_id: self.user_id,
            items: self
                .items
                .iter()
                .filter_map(|entry| {
                    catalog.get(&entry.item_id).map(|item| PopulatedEntry {
                        item: item.clone(),
                        qty: entry.qty,
                    })
                })
                .collect(),
            ordered: self.ordered,
        }
    }
}

/// A cart with item references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedCart {
    #[serde(rename = "_id")]
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<PopulatedEntry>,
    pub ordered: bool,
}

/// A cart entry with its item resolved. The item keeps the `itemId` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulatedEntry {
    #[serde(rename = "itemId")]
    pub item: Item,
    pub qty: i64,
}

/// One line of the cart display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub item_id: ItemId,
    pub name: String,
    pub price: Price,
    pub category: String,
    pub photo: String,
    pub qty: i64,
}
