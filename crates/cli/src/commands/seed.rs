//! Seed the catalog from a YAML file.
//!
//! The file is a list of items:
//!
//! ```yaml
//! - name: Mug
//!   price: 5.00
//!   category: Kitchen
//!   photo: /img/mug.jpg
//! ```
//!
//! Every entry is validated before connecting to the database. Each item gets
//! a fresh id and goes through the same `ItemRepository` the API reads from.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use bazaar_api::config::{ConfigError, get_database_url};
use bazaar_api::db::{self, ItemRepository, PgStore, RepositoryError};
use bazaar_api::models::NewItem;
use bazaar_core::Price;

/// Errors from seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} invalid entries")]
    Invalid(usize),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Insert failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// Seed catalog items from a YAML file.
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or parsed, any entry is
/// invalid, or the database rejects an insert.
pub async fn items(path: &Path, dry_run: bool) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    info!(path = %path.display(), "Loading items from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
    let items = parse_items(&content)?;

    info!(items = items.len(), "Configuration validated successfully");

    if dry_run {
        info!("Dry run, nothing inserted");
        return Ok(());
    }

    let database_url = get_database_url("BAZAAR_DATABASE_URL")?;
    let store = PgStore::new(db::create_pool(&database_url).await?);
    info!("Connected to database");

    for new_item in items {
        let item = new_item.into_item();
        store.insert_item(&item).await?;
        info!(id = %item.id, name = %item.name, "Inserted item");
    }

    info!("Seeding complete!");
    Ok(())
}

/// Parse and validate a YAML item list.
fn parse_items(content: &str) -> Result<Vec<NewItem>, SeedError> {
    let items: Vec<NewItem> = serde_yaml::from_str(content)?;

    let problems: Vec<String> = items
        .iter()
        .enumerate()
        .flat_map(|(index, item)| validate(item).into_iter().map(move |p| format!("#{index}: {p}")))
        .collect();

    if !problems.is_empty() {
        error!("Configuration validation failed:");
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(SeedError::Invalid(problems.len()));
    }

    Ok(items)
}

fn validate(item: &NewItem) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if item.name.trim().is_empty() {
        problems.push("name is empty");
    }
    if item.category.trim().is_empty() {
        problems.push("category is empty");
    }
    if item.price < Price::ZERO {
        problems.push("price is negative");
    }
    problems
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items() {
        let items = parse_items(
            "- name: Mug\n  price: 5.5\n  category: Kitchen\n  photo: /img/mug.jpg\n\
             - name: Plate\n  price: 3\n  category: Kitchen\n",
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].price, Price::from_cents(550));
        assert!(items[1].photo.is_empty());
    }

    #[test]
    fn test_parse_items_rejects_invalid_entries() {
        let err = parse_items(
            "- name: ''\n  price: -1\n  category: Kitchen\n\
             - name: Plate\n  price: 3\n  category: ' '\n",
        )
        .unwrap_err();

        assert!(matches!(err, SeedError::Invalid(3)));
    }

    #[test]
    fn test_parse_items_rejects_bad_yaml() {
        assert!(matches!(
            parse_items("name: not-a-list"),
            Err(SeedError::Yaml(_))
        ));
    }
}
