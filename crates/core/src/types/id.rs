//! Newtype IDs for type-safe entity references.
//!
//! Menu items are identified by opaque strings assigned by the menu source
//! (e.g. `"1"`, `"wagyu-burger"`). Wrapping them prevents mixing a menu item
//! ID with arbitrary display text such as a name or image URL.

use serde::{Deserialize, Serialize};

/// Stable identifier of a menu item.
///
/// Serialized transparently as a JSON string.
///
/// # Example
///
/// ```rust
/// # use tavola_core::MenuItemId;
/// let id = MenuItemId::new("wagyu-burger");
/// assert_eq!(id.as_str(), "wagyu-burger");
/// assert_eq!(id.to_string(), "wagyu-burger");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(String);

impl MenuItemId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ::core::fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MenuItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MenuItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<MenuItemId> for String {
    fn from(id: MenuItemId) -> Self {
        id.0
    }
}

impl AsRef<str> for MenuItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
