//! Pricing
//!
//! Line and aggregate totals. Totals are always derived from unit price and quantity; nothing
//! here trusts a previously stored total.

use rust_decimal::Decimal;

use crate::currency::Currency;

pub mod tiers;

pub use tiers::{PriceTier, select_tier};

/// A priced line of a cart or an order.
pub trait PricedLine {
    /// Price of a single unit.
    fn unit_price(&self) -> Decimal;

    /// Number of units.
    fn quantity(&self) -> u32;

    /// Currency of the unit price.
    fn currency(&self) -> &Currency;

    /// Unit price multiplied by quantity.
    fn total_price(&self) -> Decimal {
        line_total(self.unit_price(), self.quantity())
    }
}

/// Unit price multiplied by quantity.
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Subtotal and currency derived from a list of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    /// Sum of line totals.
    pub subtotal: Decimal,

    /// Currency of the first line, or the fallback for no lines.
    pub currency: Currency,
}

impl Totals {
    /// Derives totals from `lines`, taking the currency from the first line.
    pub fn from_lines<L: PricedLine>(lines: &[L], fallback: &Currency) -> Self {
        let currency = lines
            .first()
            .map_or_else(|| fallback.clone(), |line| line.currency().clone());

        let subtotal = lines.iter().map(PricedLine::total_price).sum();

        Self { subtotal, currency }
    }
}
