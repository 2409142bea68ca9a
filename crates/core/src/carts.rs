//! Carts
//!
//! Cart lifecycle and line matching. A cart is `active` until it is either absorbed into another
//! cart (`merged`) or checked out (`completed`); both are terminal.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::configuration::{Configuration, Fingerprint};

/// Cart lifecycle errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartStatusError {
    /// The cart is merged or completed and can no longer change.
    #[error("cart is {0}, not active")]
    NotActive(CartStatus),

    /// The stored status tag is not recognized.
    #[error("unknown cart status {0:?}")]
    Unknown(String),
}

/// Lifecycle state of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// Open for changes.
    Active,

    /// Absorbed into another cart.
    Merged,

    /// Converted into an order.
    Completed,
}

impl CartStatus {
    /// Tag used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Merged => "merged",
            Self::Completed => "completed",
        }
    }

    /// Fails unless the cart is active.
    ///
    /// # Errors
    ///
    /// - [`CartStatusError::NotActive`]: the cart is merged or completed.
    pub fn ensure_active(self) -> Result<(), CartStatusError> {
        match self {
            Self::Active => Ok(()),
            Self::Merged | Self::Completed => Err(CartStatusError::NotActive(self)),
        }
    }

    /// Moves an active cart into `to`.
    ///
    /// # Errors
    ///
    /// - [`CartStatusError::NotActive`]: the cart is already terminal, or `to` is `active`.
    pub fn transition(self, to: Self) -> Result<Self, CartStatusError> {
        self.ensure_active()?;

        match to {
            Self::Merged | Self::Completed => Ok(to),
            Self::Active => Err(CartStatusError::NotActive(self)),
        }
    }
}

impl Display for CartStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for CartStatus {
    type Err = CartStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "merged" => Ok(Self::Merged),
            "completed" => Ok(Self::Completed),
            _ => Err(CartStatusError::Unknown(s.to_string())),
        }
    }
}

/// Identity of a cart line for deduplication.
pub trait CartLine {
    /// Cart the line belongs to.
    fn cart_uuid(&self) -> Uuid;

    /// Product on the line.
    fn product_uuid(&self) -> Uuid;

    /// Variant on the line, if any.
    fn variant_uuid(&self) -> Option<Uuid>;

    /// Configuration of the line, if any.
    fn configuration(&self) -> Option<&Configuration>;
}

/// What an incoming "add to cart" request would put on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineKey {
    /// Target cart.
    pub cart_uuid: Uuid,

    /// Requested product.
    pub product_uuid: Uuid,

    /// Requested variant. `None` only matches lines without a variant.
    pub variant_uuid: Option<Uuid>,

    /// Fingerprint of the requested configuration.
    pub fingerprint: Fingerprint,
}

impl LineKey {
    /// Builds the key for a request, fingerprinting its configuration.
    pub fn new(
        cart_uuid: Uuid,
        product_uuid: Uuid,
        variant_uuid: Option<Uuid>,
        configuration: Option<&Configuration>,
    ) -> Self {
        Self {
            cart_uuid,
            product_uuid,
            variant_uuid,
            fingerprint: Fingerprint::of(configuration),
        }
    }

    /// Whether `line` is the same cart line as this key.
    pub fn matches<L: CartLine>(&self, line: &L) -> bool {
        line.cart_uuid() == self.cart_uuid
            && line.product_uuid() == self.product_uuid
            && line.variant_uuid() == self.variant_uuid
            && Fingerprint::of(line.configuration()) == self.fingerprint
    }

    /// First line in `lines` matching this key.
    pub fn find_in<'a, L: CartLine>(&self, lines: &'a [L]) -> Option<&'a L> {
        lines.iter().find(|line| self.matches(*line))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug)]
    struct Line {
        uuid: Uuid,
        cart: Uuid,
        product: Uuid,
        variant: Option<Uuid>,
        configuration: Option<Configuration>,
    }

    impl CartLine for Line {
        fn cart_uuid(&self) -> Uuid {
            self.cart
        }

        fn product_uuid(&self) -> Uuid {
            self.product
        }

        fn variant_uuid(&self) -> Option<Uuid> {
            self.variant
        }

        fn configuration(&self) -> Option<&Configuration> {
            self.configuration.as_ref()
        }
    }

    #[test]
    fn only_active_carts_accept_changes() {
        assert_eq!(CartStatus::Active.ensure_active(), Ok(()));
        assert_eq!(
            CartStatus::Merged.ensure_active(),
            Err(CartStatusError::NotActive(CartStatus::Merged))
        );
        assert_eq!(
            CartStatus::Completed.ensure_active(),
            Err(CartStatusError::NotActive(CartStatus::Completed))
        );
    }

    #[test]
    fn terminal_carts_cannot_transition() {
        assert_eq!(
            CartStatus::Active.transition(CartStatus::Completed),
            Ok(CartStatus::Completed)
        );
        assert_eq!(
            CartStatus::Active.transition(CartStatus::Merged),
            Ok(CartStatus::Merged)
        );
        assert!(CartStatus::Merged.transition(CartStatus::Completed).is_err());
        assert!(CartStatus::Completed.transition(CartStatus::Active).is_err());
        assert!(CartStatus::Active.transition(CartStatus::Active).is_err());
    }

    #[test]
    fn status_tags_parse() -> TestResult {
        for status in [CartStatus::Active, CartStatus::Merged, CartStatus::Completed] {
            assert_eq!(status.as_str().parse::<CartStatus>()?, status);
        }

        Ok(())
    }

    #[test]
    fn matching_requires_identical_product_variant_and_configuration() -> TestResult {
        let cart = Uuid::now_v7();
        let product = Uuid::now_v7();
        let variant = Uuid::now_v7();
        let red = Configuration::normalize(&json!({ "selections": { "colour": "red" } }))?;
        let blue = Configuration::normalize(&json!({ "selections": { "colour": "blue" } }))?;

        let lines = [
            Line {
                uuid: Uuid::now_v7(),
                cart,
                product,
                variant: None,
                configuration: red.clone(),
            },
            Line {
                uuid: Uuid::now_v7(),
                cart,
                product,
                variant: Some(variant),
                configuration: red.clone(),
            },
        ];

        let same = LineKey::new(cart, product, None, red.as_ref());
        let with_variant = LineKey::new(cart, product, Some(variant), red.as_ref());
        let other_configuration = LineKey::new(cart, product, None, blue.as_ref());
        let unconfigured = LineKey::new(cart, product, None, None);
        let other_cart = LineKey::new(Uuid::now_v7(), product, None, red.as_ref());

        assert_eq!(same.find_in(&lines).map(|line| line.uuid), lines.first().map(|line| line.uuid));
        assert_eq!(
            with_variant.find_in(&lines).map(|line| line.uuid),
            lines.get(1).map(|line| line.uuid)
        );
        assert!(other_configuration.find_in(&lines).is_none());
        assert!(unconfigured.find_in(&lines).is_none());
        assert!(other_cart.find_in(&lines).is_none());

        Ok(())
    }
}
