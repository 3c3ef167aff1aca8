//! Catalog Query: paged, category-filtered item listing.

use regex::RegexBuilder;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::db::{ItemPage, ItemRepository, RepositoryError};
use crate::models::Item;

/// Page size used when `limit` is missing or not a positive number.
pub const DEFAULT_LIMIT: i64 = 8;

/// Errors from catalog queries.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The category filter is not a valid pattern.
    #[error("invalid category pattern: {0}")]
    InvalidCategory(#[from] regex::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Raw listing parameters, as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemQuery {
    pub start: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
}

impl ItemQuery {
    /// Resolve raw parameters into a page.
    ///
    /// `start` and `limit` keep their leading integer, so `"3abc"` reads as
    /// 3. An unreadable or negative `start` becomes 0; an unreadable or
    /// non-positive `limit` becomes [`DEFAULT_LIMIT`]. `category` is a
    /// case-insensitive pattern matched anywhere in the item category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidCategory` if `category` does not compile.
    pub fn to_page(&self) -> Result<ItemPage, CatalogError> {
        let start = self
            .start
            .as_deref()
            .and_then(leading_int)
            .filter(|n| *n >= 0)
            .unwrap_or(0);
        let limit = self
            .limit
            .as_deref()
            .and_then(leading_int)
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LIMIT);
        let category = RegexBuilder::new(self.category.as_deref().unwrap_or(""))
            .case_insensitive(true)
            .build()?;

        Ok(ItemPage {
            category,
            start,
            limit,
        })
    }
}

/// List one page of catalog items in insertion order.
///
/// # Errors
///
/// Returns `CatalogError::InvalidCategory` for a bad pattern and
/// `CatalogError::Repository` if the store fails.
#[instrument(skip(items))]
pub async fn list_items(items: &dyn ItemRepository, query: &ItemQuery) -> Result<Vec<Item>, CatalogError> {
    let page = query.to_page()?;
    Ok(items.list_items(&page).await?)
}

/// Read the integer at the start of `raw`, ignoring trailing text.
fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    // Digits beyond i64 saturate instead of failing.
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}
