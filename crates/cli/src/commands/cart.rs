//! Cart commands.
//!
//! Each invocation opens the cart store on the configured storage slot (which
//! rehydrates it), applies at most one command, and reports the result.

use std::sync::Arc;

use rust_decimal::Decimal;
use tavola_core::{CartItem, CartState, MenuItemId, OrderSummary};
use tavola_storefront::config::StorefrontConfig;
use tavola_storefront::menu::MenuCatalog;
use tavola_storefront::storage::JsonFileStorage;
use tavola_storefront::store::CartStore;
use tracing::info;

use super::CommandError;

/// Open the file-backed cart store described by the configuration.
#[must_use]
pub fn open_store(config: &StorefrontConfig) -> CartStore {
    let storage = Arc::new(JsonFileStorage::new(&config.cart.data_dir));
    CartStore::open(storage, config.cart.storage_key.clone())
}

/// Add one unit of a menu item, looked up by ID.
///
/// # Errors
///
/// Returns an error if the menu cannot be loaded or has no such item.
pub fn add(store: &CartStore, config: &StorefrontConfig, id: &str) -> Result<CartState, CommandError> {
    let catalog = MenuCatalog::load(&config.menu_path)?;
    let item = catalog
        .get(&MenuItemId::from(id))
        .map(CartItem::from)
        .ok_or_else(|| CommandError::UnknownItem(id.to_string()))?;

    info!("Adding {} ({})", item.name, item.price);
    Ok(store.add_item(item))
}

/// Log the cart lines and order summary.
pub fn report(cart: &CartState, tax_rate: Decimal) {
    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    for line in cart.items() {
        info!(
            "  {:>4}  {:<32} {:>3} x {:>8} = {:>9}",
            line.id,
            line.name,
            line.quantity,
            line.price.to_string(),
            line.subtotal().to_string()
        );
    }

    let summary = OrderSummary::for_cart(cart, tax_rate);
    info!("Items:    {}", summary.item_count);
    info!("Subtotal: {}", summary.subtotal);
    info!("Tax:      {}", summary.tax);
    info!("Shipping: Free");
    info!("Total:    {}", summary.grand_total);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use tavola_core::Price;

    use super::*;

    fn config_in(dir: &std::path::Path) -> StorefrontConfig {
        let mut config = StorefrontConfig::from_vars(|_| None).unwrap();
        config.cart.data_dir = dir.to_path_buf();
        config.menu_path =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/content/menu.json");
        config
    }

    #[test]
    fn test_cart_survives_between_invocations() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = config_in(temp_dir.path());

        {
            let store = open_store(&config);
            add(&store, &config, "1").unwrap();
            add(&store, &config, "1").unwrap();
        }

        let store = open_store(&config);
        let cart = store.current();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items().first().unwrap().quantity, 2);
        assert_eq!(cart.total(), Price::from_cents(4998));
    }

    #[test]
    fn test_purge_removes_cart_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = config_in(temp_dir.path());
        let store = open_store(&config);
        add(&store, &config, "3").unwrap();

        let slot = temp_dir.path().join("restaurant_cart.json");
        assert!(slot.exists());

        store.purge().unwrap();
        assert!(!slot.exists());
        assert!(open_store(&config).current().is_empty());
    }

    #[test]
    fn test_add_unknown_item() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = config_in(temp_dir.path());
        let store = open_store(&config);

        let err = add(&store, &config, "no-such-dish").unwrap_err();
        assert!(matches!(err, CommandError::UnknownItem(_)));
        assert!(store.current().is_empty());
    }
}
