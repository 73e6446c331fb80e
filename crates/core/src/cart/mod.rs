//! Cart state and the reducer that drives it.
//!
//! A [`CartState`] is an immutable value: every [`CartCommand`] applied to it
//! yields a new state. The running `total` is maintained incrementally by each
//! command rather than recomputed from the lines, so every transition must
//! apply exactly the right delta. [`CartState::is_consistent`] checks that
//! `total == Σ price × quantity` still holds.
//!
//! # Example
//!
//! ```rust
//! use tavola_core::{CartCommand, CartItem, CartState, Price};
//!
//! let burger = CartItem::new("1", "Wagyu Burger", Price::from_cents(2499));
//! let cart = CartState::default()
//!     .apply(CartCommand::AddItem(burger.clone()))
//!     .apply(CartCommand::AddItem(burger));
//!
//! assert_eq!(cart.items().len(), 1);
//! assert_eq!(cart.total(), Price::from_cents(4998));
//! ```

mod summary;

pub use summary::{DEFAULT_TAX_RATE, OrderSummary};

use serde::{Deserialize, Serialize};

use crate::menu::MenuItem;
use crate::types::{MenuItemId, Price};

/// An item as offered to the cart: everything a line needs except quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: Price,
}

impl CartItem {
    /// Create a cart item without an image.
    #[must_use]
    pub fn new(id: impl Into<MenuItemId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            price,
        }
    }
}

impl From<&MenuItem> for CartItem {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            price: item.price,
        }
    }
}

/// One line of the cart: a menu item and how many of it were selected.
///
/// `quantity` is at least 1; a line whose quantity drops to zero is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: Price,
    pub quantity: u32,
}

impl CartLine {
    fn first_of(item: CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            image: item.image,
            price: item.price,
            quantity: 1,
        }
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Commands accepted by the cart reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add one unit of an item, creating its line if needed.
    AddItem(CartItem),
    /// Drop the line for an item. Unknown IDs are ignored.
    RemoveItem(MenuItemId),
    /// Set the quantity of an existing line.
    ///
    /// Zero or negative quantities remove the line. Unknown IDs are ignored.
    UpdateQuantity { id: MenuItemId, quantity: i64 },
    /// Empty the cart.
    Clear,
    /// Replace the whole state (rehydration). Not validated.
    Load(CartState),
}

impl CartCommand {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddItem(_) => "add_item",
            Self::RemoveItem(_) => "remove_item",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::Clear => "clear",
            Self::Load(_) => "load",
        }
    }
}

/// The cart: ordered lines plus an incrementally maintained total.
///
/// Lines keep first-add order and IDs are unique. Serializes as
/// `{ "items": [...], "total": <number> }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<CartLine>,
    total: Price,
}

impl CartState {
    /// Lines in first-add order.
    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Running total.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Find the line for an item.
    #[must_use]
    pub fn line(&self, id: &MenuItemId) -> Option<&CartLine> {
        self.items.iter().find(|line| &line.id == id)
    }

    /// `Σ price × quantity`, computed from scratch.
    #[must_use]
    pub fn recomputed_total(&self) -> Price {
        self.items.iter().map(CartLine::subtotal).sum()
    }

    /// Returns `true` if the running total matches the lines.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total == self.recomputed_total()
    }

    /// Apply a command, producing the next state.
    ///
    /// A command whose line subtotal or running total would overflow is
    /// ignored and the state is returned unchanged.
    #[must_use]
    pub fn apply(&self, command: CartCommand) -> Self {
        match command {
            CartCommand::AddItem(item) => self.with_item_added(item),
            CartCommand::RemoveItem(id) => self.with_item_removed(&id),
            CartCommand::UpdateQuantity { id, quantity } => self.with_quantity(&id, quantity),
            CartCommand::Clear => Self::default(),
            CartCommand::Load(state) => state,
        }
    }

    fn position(&self, id: &MenuItemId) -> Option<usize> {
        self.items.iter().position(|line| &line.id == id)
    }

    fn with_item_added(&self, item: CartItem) -> Self {
        let mut next = self.clone();
        // A command whose total would overflow leaves the cart as it was.
        let Some(total) = next.total.checked_add(item.price) else {
            return next;
        };
        match next.position(&item.id) {
            Some(index) => {
                let Some(line) = next.items.get_mut(index) else {
                    return next;
                };
                // A saturated line cannot grow, and the total must not either.
                let Some(quantity) = line.quantity.checked_add(1) else {
                    return next;
                };
                line.quantity = quantity;
            }
            None => next.items.push(CartLine::first_of(item)),
        }
        next.total = total;
        next
    }

    fn with_item_removed(&self, id: &MenuItemId) -> Self {
        let mut next = self.clone();
        let Some(index) = next.position(id) else {
            return next;
        };
        let Some(total) = next
            .items
            .get(index)
            .and_then(|line| line.price.checked_times(line.quantity))
            .and_then(|subtotal| next.total.checked_sub(subtotal))
        else {
            return next;
        };
        next.items.remove(index);
        next.total = total;
        next
    }

    fn with_quantity(&self, id: &MenuItemId, quantity: i64) -> Self {
        if quantity <= 0 {
            return self.with_item_removed(id);
        }

        let mut next = self.clone();
        let Some(index) = next.position(id) else {
            return next;
        };
        let Some(line) = next.items.get_mut(index) else {
            return next;
        };
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let Some(total) = line
            .price
            .checked_times(line.quantity)
            .and_then(|before| next.total.checked_sub(before))
            .zip(line.price.checked_times(quantity))
            .and_then(|(rest, after)| rest.checked_add(after))
        else {
            return self.clone();
        };
        line.quantity = quantity;
        next.total = total;
        next
    }
}
