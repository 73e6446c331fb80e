//! Menu listing command.

use tavola_core::MenuQuery;
use tavola_storefront::config::StorefrontConfig;
use tavola_storefront::menu::MenuCatalog;
use tracing::info;

use super::CommandError;

/// List menu items matching the filters.
///
/// # Errors
///
/// Returns an error if the menu cannot be loaded or a filter is unknown.
pub fn list(
    config: &StorefrontConfig,
    category: Option<&str>,
    dietary: Option<&str>,
    sort: Option<&str>,
) -> Result<(), CommandError> {
    let query = MenuQuery::parse(category, dietary, sort)?;
    let catalog = MenuCatalog::load(&config.menu_path)?;
    let items = catalog.query(&query);

    info!(
        "{} of {} items (sort: {})",
        items.len(),
        catalog.len(),
        query.sort
    );
    for item in items {
        let spicy = item
            .spicy_level
            .map(|level| format!(" [{level}]"))
            .unwrap_or_default();
        info!(
            "  {:>4}  {:<32} {:>8}  {:.1}★  {}{}",
            item.id,
            item.name,
            item.price.to_string(),
            item.rating,
            item.category,
            spicy
        );
    }
    Ok(())
}
