//! Catalog errors.

use thiserror::Error;
use trolley::currency::CurrencyError;
use uuid::Uuid;

/// Errors raised by the catalog HTTP client.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product lookup did not succeed.
    #[error("product {0} not found in catalog")]
    ProductNotFound(Uuid),

    /// A price lookup or calculation did not succeed.
    #[error("no price available for product {0}")]
    PriceNotAvailable(Uuid),

    /// An HTTP transport or serialization error occurred.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while resolving the price of a cart line.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The catalog does not know the product.
    #[error("product {0} not found in catalog")]
    ProductNotFound(Uuid),

    /// The catalog could not price the product.
    #[error("no price available for product {0}")]
    PriceNotAvailable(Uuid),

    /// The catalog reported a product type no pricing strategy exists for.
    #[error("unknown product type {0:?}")]
    UnknownProductType(String),

    /// The configuration does not fit the product type.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The catalog answered with a currency code that is not ISO 4217.
    #[error("catalog returned an invalid currency")]
    InvalidCurrency(#[from] CurrencyError),

    /// The catalog could not be reached.
    #[error("catalog unavailable")]
    Catalog(#[source] CatalogError),
}

impl From<CatalogError> for PricingError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::ProductNotFound(product) => Self::ProductNotFound(product),
            CatalogError::PriceNotAvailable(product) => Self::PriceNotAvailable(product),
            CatalogError::Http(_) => Self::Catalog(error),
        }
    }
}
