//! Item collection.

use std::collections::HashMap;

use async_trait::async_trait;
use regex::Regex;

use bazaar_core::{ItemId, Price};

use super::{PgStore, RepositoryError, conflict_or_database};
use crate::models::Item;

/// One page of a category-filtered item listing.
#[derive(Debug, Clone)]
pub struct ItemPage {
    /// Case-insensitive pattern matched against `category`. The empty
    /// pattern matches every item.
    pub category: Regex,
    /// Number of matching items to skip.
    pub start: i64,
    /// Maximum number of items to return.
    pub limit: i64,
}

impl ItemPage {
    /// Whether the category filter accepts every item.
    #[must_use]
    pub fn matches_everything(&self) -> bool {
        self.category.as_str().is_empty()
    }

    /// Filter `items`, already in listing order, and cut out this page.
    #[must_use]
    pub fn select<'a>(&self, items: impl IntoIterator<Item = &'a Item>) -> Vec<Item> {
        let start = usize::try_from(self.start).unwrap_or(0);
        let limit = usize::try_from(self.limit).unwrap_or(0);

        items
            .into_iter()
            .filter(|item| self.category.is_match(&item.category))
            .skip(start)
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Read access to the catalog, plus inserts for seeding.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Get every item in `ids` that exists, keyed by id.
    async fn find_items(&self, ids: &[ItemId]) -> Result<HashMap<ItemId, Item>, RepositoryError>;

    /// List matching items in insertion order.
    // The category pattern is matched in Rust rather than with `~*`, so both
    // stores accept the same pattern syntax.
    async fn list_items(&self, page: &ItemPage) -> Result<Vec<Item>, RepositoryError> {
        if page.matches_everything() {
            let rows = sqlx::query_as::<_, ItemRow>(
                r"
                SELECT id, name, price, category, photo
                FROM items
                ORDER BY created_at, id
                OFFSET $1
                LIMIT $2
                ",
            )
            .bind(page.start)
            .bind(page.limit)
            .fetch_all(self.pool())
            .await?;

            return Ok(rows.into_iter().map(Item::from).collect());
        }

        let rows = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT id, name, price, category, photo
            FROM items
            ORDER BY created_at, id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        let items: Vec<Item> = rows.into_iter().map(Item::from).collect();
        Ok(page.select(&items))
    }

    async fn insert_item(&self, item: &Item) -> Result<(), RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: ItemId,
    name: String,
    price: Price,
    category: String,
    photo: String,
}

impl From<ItemRow> for Item {
    fn from(r: ItemRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            price: r.price,
            category: r.category,
            photo: r.photo,
        }
    }
}

#[async_trait]
impl ItemRepository for PgStore {
    async fn find_items(&self, ids: &[ItemId]) -> Result<HashMap<ItemId, Item>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let keys: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let rows = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT id, name, price, category, photo
            FROM items
            WHERE id = ANY($1)
            ",
        )
        .bind(&keys)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let item = Item::from(r);
                (item.id, item)
            })
            .collect())
    }

    async fn list_items(&self, page: &ItemPage) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT id, name, price, category, photo
            FROM items
            WHERE category ~* $1
            ORDER BY created_at, id
            OFFSET $2
            LIMIT $3
            ",
        )
        .bind(page.category.as_str())
        .bind(page.start)
        .bind(page.limit)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn insert_item(&self, item: &Item) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO items (id, name, price, category, photo)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.category)
        .bind(&item.photo)
        .execute(self.pool())
        .await
        .map_err(|e| conflict_or_database(e, "item"))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use regex::RegexBuilder;

    use super::*;

    fn item(name: &str, category: &str) -> Item {
        Item {
            id: ItemId::generate(),
            name: name.to_string(),
            price: Price::from_cents(100),
            category: category.to_string(),
            photo: String::new(),
        }
    }

    fn page(pattern: &str, start: i64, limit: i64) -> ItemPage {
        ItemPage {
            category: RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap(),
            start,
            limit,
        }
    }

    fn names(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_select_filters_then_pages() {
        let items = [
            item("Mug", "Kitchen"),
            item("Boot", "Shoes"),
            item("Plate", "kitchenware"),
            item("Bowl", "Kitchen"),
        ];

        assert_eq!(names(&page("kitchen", 0, 8).select(&items)), ["Mug", "Plate", "Bowl"]);
        assert_eq!(names(&page("kitchen", 1, 1).select(&items)), ["Plate"]);
        assert!(page("kitchen", 5, 8).select(&items).is_empty());
    }

    #[test]
    fn test_select_accepts_unicode_classes() {
        let items = [item("Mug", "Küche"), item("Boot", "42")];

        assert_eq!(names(&page(r"^\pL+$", 0, 8).select(&items)), ["Mug"]);
        assert_eq!(names(&page(r"(?x) \d+ ", 0, 8).select(&items)), ["Boot"]);
    }

    #[test]
    fn test_matches_everything() {
        assert!(page("", 0, 8).matches_everything());
        assert!(!page("shoes", 0, 8).matches_everything());
    }
}
