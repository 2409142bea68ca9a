//! Catalog wire models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trolley::configuration::{BundleConfiguration, ParameterMap, ParametricConfiguration};
use uuid::Uuid;

/// `GET /products/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogProduct {
    pub product_type: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// An entry of `GET /products/{id}/prices`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogPrice {
    pub min_quantity: u32,
    pub price: Decimal,
    pub currency: String,
}

/// Body of `POST /bundles/{id}/calculate-price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundlePriceRequest {
    pub components: Vec<BundleComponentRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleComponentRequest {
    pub component_id: Option<Uuid>,
    pub quantity: u32,
    pub parameters: ParameterMap,
    pub selections: ParameterMap,
}

impl From<&BundleConfiguration> for BundlePriceRequest {
    fn from(configuration: &BundleConfiguration) -> Self {
        Self {
            components: configuration
                .components
                .iter()
                .map(|component| BundleComponentRequest {
                    component_id: component.component_id,
                    quantity: component.quantity,
                    parameters: component.parameters.clone(),
                    selections: component.selections.clone(),
                })
                .collect(),
        }
    }
}

/// Response of `POST /bundles/{id}/calculate-price`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BundlePrice {
    pub total: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Body of `POST /products/{id}/calculate-price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParametricPriceRequest {
    pub selections: ParameterMap,
    pub parameters: ParameterMap,
    pub quantity: u32,
}

impl ParametricPriceRequest {
    #[must_use]
    pub fn new(configuration: &ParametricConfiguration, quantity: u32) -> Self {
        Self {
            selections: configuration.selections.clone(),
            parameters: configuration.parameters.clone(),
            quantity,
        }
    }
}

/// Response of `POST /products/{id}/calculate-price`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParametricPrice {
    pub unit_price: Decimal,
    pub currency: String,
}
