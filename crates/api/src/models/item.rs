//! Catalog item documents.

use serde::{Deserialize, Serialize};

use bazaar_core::{ItemId, Price};

/// A catalog item. Read-only reference data from the cart's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub category: String,
    /// Image URI or path.
    pub photo: String,
}

/// Item fields before an id is assigned (catalog seeding).
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: Price,
    pub category: String,
    #[serde(default)]
    pub photo: String,
}

impl NewItem {
    /// Assign a fresh id.
    #[must_use]
    pub fn into_item(self) -> Item {
        Item {
            id: ItemId::generate(),
            name: self.name,
            price: self.price,
            category: self.category,
            photo: self.photo,
        }
    }
}
