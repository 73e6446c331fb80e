//! Application state shared across handlers.

use std::sync::Arc;

use rust_decimal::Decimal;
use tavola_core::DEFAULT_TAX_RATE;

use crate::config::StorefrontConfig;
use crate::menu::{MenuCatalog, MenuError};
use crate::storage::{CartStorage, JsonFileStorage};
use crate::store::CartStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// cart store, the menu and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cart: CartStore,
    menu: MenuCatalog,
    tax_rate: Decimal,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Loads the menu and opens (rehydrates) the file-backed cart store.
    ///
    /// # Errors
    ///
    /// Returns an error if the menu cannot be loaded.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, MenuError> {
        let menu = MenuCatalog::load(&config.menu_path)?;
        let storage: Arc<dyn CartStorage> = Arc::new(JsonFileStorage::new(&config.cart.data_dir));
        let cart = CartStore::open(storage, config.cart.storage_key.clone());

        Ok(Self::new(cart, menu, config.tax_rate))
    }

    /// Create application state from already-built parts.
    #[must_use]
    pub fn new(cart: CartStore, menu: MenuCatalog, tax_rate: Decimal) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cart,
                menu,
                tax_rate,
            }),
        }
    }

    /// Create state with the default tax rate.
    #[must_use]
    pub fn with_defaults(cart: CartStore, menu: MenuCatalog) -> Self {
        Self::new(cart, menu, DEFAULT_TAX_RATE)
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the menu catalog.
    #[must_use]
    pub fn menu(&self) -> &MenuCatalog {
        &self.inner.menu
    }

    /// Sales tax rate for order summaries.
    #[must_use]
    pub fn tax_rate(&self) -> Decimal {
        self.inner.tax_rate
    }
}
