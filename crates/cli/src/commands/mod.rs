//! CLI command implementations.

pub mod cart;
pub mod menu;

use tavola_core::menu::MenuFilterError;
use tavola_storefront::config::ConfigError;
use tavola_storefront::menu::MenuError;
use tavola_storefront::storage::StorageError;
use thiserror::Error;

/// Errors that can occur running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Menu file could not be loaded.
    #[error(transparent)]
    Menu(#[from] MenuError),

    /// Menu filter value is invalid.
    #[error(transparent)]
    Filter(#[from] MenuFilterError),

    /// Cart slot could not be removed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Item is not on the menu.
    #[error("No menu item with id {0}")]
    UnknownItem(String),
}
