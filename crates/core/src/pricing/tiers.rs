//! Tiered prices

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// A quantity-based price rule for simple and variant products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Smallest quantity the tier applies to.
    pub min_quantity: u32,

    /// Unit price within the tier.
    pub price: Decimal,

    /// Currency of `price`.
    pub currency: Currency,
}

/// Selects the tier for `quantity`.
///
/// Picks the tier with the largest `min_quantity` not exceeding `quantity`. When no tier
/// qualifies, falls back to the tier with the smallest `min_quantity`. Returns `None` only for
/// an empty tier list.
pub fn select_tier(tiers: &[PriceTier], quantity: u32) -> Option<&PriceTier> {
    tiers
        .iter()
        .filter(|tier| tier.min_quantity <= quantity)
        .max_by_key(|tier| tier.min_quantity)
        .or_else(|| tiers.iter().min_by_key(|tier| tier.min_quantity))
}
