//! Catalog
//!
//! The product catalog is an external service. [`HttpCatalogClient`] speaks its HTTP API and
//! [`CatalogPriceResolver`] turns its answers into a unit price for a cart line, picking the
//! pricing strategy from the product type.

pub mod client;
pub mod errors;
pub mod models;
pub mod resolver;

pub use client::*;
pub use errors::{CatalogError, PricingError};
pub use resolver::*;
