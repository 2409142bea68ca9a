//! Products

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a product type tag is not one of the supported strategies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown product type {0:?}")]
pub struct UnknownProductType(pub String);

/// Pricing strategy of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// Single SKU priced from a tier list.
    Simple,

    /// Variant of a product, priced from the variant's tier list.
    Variant,

    /// Bundle of components, priced by the catalog as a whole.
    Bundle,

    /// Product priced from parameters and option selections.
    Parametric,
}

impl ProductType {
    /// Tag used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Variant => "variant",
            Self::Bundle => "bundle",
            Self::Parametric => "parametric",
        }
    }

    /// Whether the product is priced from a tier list.
    pub fn is_tiered(self) -> bool {
        matches!(self, Self::Simple | Self::Variant)
    }
}

impl Display for ProductType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = UnknownProductType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "variant" => Ok(Self::Variant),
            "bundle" => Ok(Self::Bundle),
            "parametric" => Ok(Self::Parametric),
            _ => Err(UnknownProductType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_types_parse_case_insensitively() -> TestResult {
        assert_eq!("Bundle".parse::<ProductType>()?, ProductType::Bundle);
        assert_eq!("parametric".parse::<ProductType>()?, ProductType::Parametric);

        Ok(())
    }

    #[test]
    fn unknown_product_type_is_rejected() {
        assert_eq!(
            "subscription".parse::<ProductType>(),
            Err(UnknownProductType("subscription".to_string()))
        );
    }

    #[test]
    fn only_simple_and_variant_are_tiered() {
        assert!(ProductType::Simple.is_tiered());
        assert!(ProductType::Variant.is_tiered());
        assert!(!ProductType::Bundle.is_tiered());
        assert!(!ProductType::Parametric.is_tiered());
    }
}
