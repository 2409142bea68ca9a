//! Orders

use rust_decimal::Decimal;

use crate::{
    currency::Currency,
    pricing::{PricedLine, Totals},
};

mod numbers;
mod status;

pub use numbers::OrderNumber;
pub use status::{OrderStatus, OrderStatusError, StatusChange};

/// Monetary totals frozen onto an order at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,

    /// Tax; not computed yet, always zero.
    pub tax: Decimal,

    /// Subtotal plus tax.
    pub total: Decimal,

    /// Currency of the first line, or the fallback.
    pub currency: Currency,
}

impl OrderTotals {
    /// Freezes totals for `lines`.
    pub fn from_lines<L: PricedLine>(lines: &[L], fallback: &Currency) -> Self {
        let Totals { subtotal, currency } = Totals::from_lines(lines, fallback);
        let tax = Decimal::ZERO;

        Self {
            subtotal,
            tax,
            total: subtotal + tax,
            currency,
        }
    }
}
