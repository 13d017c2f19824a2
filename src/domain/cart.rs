use std::cell::Cell;

use super::ids::CartLineId;
use super::response::CartTotals;

/// One cart line as rendered on the cart page.
///
/// `acknowledged` is the quantity the server last accepted for this line;
/// a rejected edit rolls the input back to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: CartLineId,
    pub max_stock: u32,
    acknowledged: Cell<u32>,
}

impl CartLine {
    pub fn new(id: impl Into<CartLineId>, max_stock: u32, quantity: u32) -> Self {
        Self {
            id: id.into(),
            max_stock,
            acknowledged: Cell::new(quantity),
        }
    }

    pub fn acknowledged(&self) -> u32 {
        self.acknowledged.get()
    }

    pub fn acknowledge(&self, quantity: u32) {
        self.acknowledged.set(quantity);
    }
}

/// Cart totals as displayed, rebuilt from every server response.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
    pub subtotal: f64,
    pub total: f64,
    pub item_count: u32,
}

impl CartSummary {
    /// The server reports the subtotal; the displayed total adds the
    /// delivery fee on top of it.
    pub fn from_totals(totals: &CartTotals, delivery_fee: f64) -> Self {
        Self {
            subtotal: totals.total,
            total: totals.total + delivery_fee,
            item_count: totals.cart_count,
        }
    }
}

/// Render an amount with the currency prefix and two decimals.
pub fn format_price(amount: f64, currency_symbol: &str) -> String {
    format!("{currency_symbol}{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_adds_delivery_fee() {
        let totals = CartTotals {
            total: 250.0,
            cart_count: 3,
        };
        let summary = CartSummary::from_totals(&totals, 50.0);
        assert_eq!(summary.subtotal, 250.0);
        assert_eq!(summary.total, 300.0);
        assert_eq!(summary.item_count, 3);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(300.0, "₱"), "₱300.00");
        assert_eq!(format_price(149.5, "₱"), "₱149.50");
        assert_eq!(format_price(0.0, "$"), "$0.00");
    }

    #[test]
    fn test_line_remembers_acknowledged_quantity() {
        let line = CartLine::new("9", 5, 2);
        assert_eq!(line.acknowledged(), 2);
        line.acknowledge(4);
        assert_eq!(line.acknowledged(), 4);
    }
}
