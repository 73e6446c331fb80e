//! Menu catalog loaded from a JSON file at start-up.
//!
//! The file is a JSON array of menu items:
//!
//! ```json
//! [
//!   {
//!     "id": "1",
//!     "name": "Wagyu Beef Burger",
//!     "price": 24.99,
//!     "category": "main-courses",
//!     "dietary": [],
//!     "rating": 4.8,
//!     "prep_time": "20 min",
//!     "spicy_level": "medium"
//!   }
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tavola_core::{MenuItem, MenuItemId, MenuQuery};
use thiserror::Error;

/// Errors loading the menu.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("failed to read menu file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid menu JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate menu item id: {0}")]
    DuplicateId(MenuItemId),

    #[error("menu item {0} has a negative price")]
    NegativePrice(MenuItemId),
}

/// Immutable, cheaply cloneable menu.
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    items: Arc<Vec<MenuItem>>,
}

impl MenuCatalog {
    /// Build a catalog from items, validating IDs and prices.
    ///
    /// # Errors
    ///
    /// Returns `MenuError` on duplicate IDs or negative prices.
    pub fn new(items: Vec<MenuItem>) -> Result<Self, MenuError> {
        {
            let mut seen = HashSet::new();
            for item in &items {
                if !seen.insert(&item.id) {
                    return Err(MenuError::DuplicateId(item.id.clone()));
                }
                if item.price.is_negative() {
                    return Err(MenuError::NegativePrice(item.id.clone()));
                }
            }
        }

        Ok(Self {
            items: Arc::new(items),
        })
    }

    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `MenuError` if the JSON is invalid or fails validation.
    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `MenuError` if the file cannot be read or fails validation.
    pub fn load(path: &Path) -> Result<Self, MenuError> {
        let json = std::fs::read_to_string(path).map_err(|source| MenuError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), items = catalog.len(), "menu loaded");
        Ok(catalog)
    }

    /// All items in catalog order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the menu has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by ID.
    #[must_use]
    pub fn get(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Filter and order the menu.
    #[must_use]
    pub fn query(&self, query: &MenuQuery) -> Vec<&MenuItem> {
        query.apply(&self.items)
    }
}
