//! Core types for Tavola.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::MenuItemId;
pub use price::Price;
