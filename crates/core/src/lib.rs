//! Tavola Core - Shared types and cart logic.
//!
//! This crate provides the domain types used across all Tavola components:
//! - `storefront` - HTTP storefront serving the menu and the cart API
//! - `cli` - Command-line tools for inspecting the menu and driving the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no HTTP. Persistence and publication of cart state live in the storefront.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for menu item IDs and prices
//! - [`cart`] - Cart state, commands, the reducer and the order summary
//! - [`menu`] - Menu items and catalog filtering/sorting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod menu;
pub mod types;

pub use cart::{CartCommand, CartItem, CartLine, CartState, DEFAULT_TAX_RATE, OrderSummary};
pub use menu::{Category, Dietary, MenuItem, MenuQuery, SortOrder, SpicyLevel};
pub use types::*;
