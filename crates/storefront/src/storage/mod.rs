//! Durable storage slots for client state.
//!
//! A slot is a named string blob (the cart lives in `restaurant_cart`). The
//! storage layer knows nothing about the blob's shape; encoding is the
//! caller's concern.
//!
//! # Implementations
//!
//! - [`JsonFileStorage`] - one `<dir>/<key>.json` file per slot
//! - [`MemoryStorage`] - in-process map for tests and ephemeral runs

mod file;
mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage slot holding the cart snapshot.
pub const CART_STORAGE_KEY: &str = "restaurant_cart";

/// Errors that can occur reading or writing a slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Key cannot be mapped to a slot.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Keyed string-slot storage.
///
/// Implementations must make a completed `write` visible to every later
/// `read` of the same key.
pub trait CartStorage: Send + Sync {
    /// Read a slot. Returns `Ok(None)` if nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a slot's contents.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Removing a missing slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reject keys that could escape a storage directory.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !key.starts_with('.');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key(CART_STORAGE_KEY).is_ok());
        assert!(validate_key("cart-v2.backup").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("a/b").is_err());
    }
}
