//! Order summary shown beside the cart and at checkout.

use rust_decimal::Decimal;
use serde::Serialize;

use super::CartState;
use crate::types::Price;

/// Default sales tax rate (10%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Derived totals for a cart.
///
/// Shipping is always free; tax is rounded to whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub item_count: u64,
    pub subtotal: Price,
    pub tax: Price,
    pub shipping: Price,
    pub grand_total: Price,
}

impl OrderSummary {
    /// Summarize a cart at the given tax rate.
    #[must_use]
    pub fn for_cart(cart: &CartState, tax_rate: Decimal) -> Self {
        let subtotal = cart.total();
        let tax = subtotal.scaled_by(tax_rate);
        let shipping = Price::ZERO;

        Self {
            item_count: cart.item_count(),
            subtotal,
            tax,
            shipping,
            grand_total: subtotal + tax + shipping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartCommand, CartItem};

    #[test]
    fn test_empty_cart_summary() {
        let summary = OrderSummary::for_cart(&CartState::default(), DEFAULT_TAX_RATE);

        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.grand_total, Price::ZERO);
    }

    #[test]
    fn test_summary_adds_tax() {
        let cart = CartState::default()
            .apply(CartCommand::AddItem(CartItem::new("a", "A", Price::from_cents(1000))))
            .apply(CartCommand::AddItem(CartItem::new("b", "B", Price::from_cents(2499))))
            .apply(CartCommand::AddItem(CartItem::new("b", "B", Price::from_cents(2499))));

        let summary = OrderSummary::for_cart(&cart, DEFAULT_TAX_RATE);

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal, Price::from_cents(5998));
        // 59.98 * 0.10 = 5.998 -> 6.00
        assert_eq!(summary.tax, Price::from_cents(600));
        assert_eq!(summary.shipping, Price::ZERO);
        assert_eq!(summary.grand_total, Price::from_cents(6598));
    }

    #[test]
    fn test_zero_tax_rate() {
        let cart = CartState::default()
            .apply(CartCommand::AddItem(CartItem::new("a", "A", Price::from_cents(1234))));

        let summary = OrderSummary::for_cart(&cart, Decimal::ZERO);

        assert_eq!(summary.tax, Price::ZERO);
        assert_eq!(summary.grand_total, Price::from_cents(1234));
    }
}
