//! Catalog price resolver.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use trolley::{
    configuration::{BundleConfiguration, Configuration, ParametricConfiguration},
    currency::Currency,
    pricing::{PriceTier, select_tier},
    products::{ProductType, UnknownProductType},
};
use uuid::Uuid;

use crate::{
    catalog::{
        client::CatalogClient,
        errors::PricingError,
        models::{BundlePriceRequest, ParametricPriceRequest},
    },
    domain::tenants::models::TenantUuid,
};

/// What to price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuery {
    pub product_uuid: Uuid,
    pub variant_uuid: Option<Uuid>,
    pub quantity: u32,
    pub configuration: Option<Configuration>,
}

/// Display fields captured onto cart lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub name: String,
    pub sku: Option<String>,
    pub image_url: Option<String>,
}

/// Price and display data for a cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrice {
    pub unit_price: Decimal,
    pub currency: Currency,
    pub product_type: ProductType,
    pub details: ProductDetails,
}

/// Prices cart lines against the catalog.
#[derive(Clone)]
pub struct CatalogPriceResolver {
    catalog: Arc<dyn CatalogClient>,
    fallback_currency: Currency,
}

impl CatalogPriceResolver {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogClient>, fallback_currency: Currency) -> Self {
        Self {
            catalog,
            fallback_currency,
        }
    }

    async fn tiered_price(
        &self,
        tenant: TenantUuid,
        query: &PriceQuery,
    ) -> Result<(Decimal, Currency), PricingError> {
        let tiers = self
            .catalog
            .get_prices(tenant, query.product_uuid, query.variant_uuid)
            .await?
            .into_iter()
            .map(|price| -> Result<PriceTier, PricingError> {
                Ok(PriceTier {
                    min_quantity: price.min_quantity,
                    price: price.price,
                    currency: Currency::new(&price.currency)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tier = select_tier(&tiers, query.quantity)
            .ok_or(PricingError::PriceNotAvailable(query.product_uuid))?;

        Ok((tier.price, tier.currency.clone()))
    }

    async fn bundle_price(
        &self,
        tenant: TenantUuid,
        query: &PriceQuery,
    ) -> Result<(Decimal, Currency), PricingError> {
        let empty = BundleConfiguration::default();

        let configuration = match &query.configuration {
            None => &empty,
            Some(configuration) => configuration.as_bundle().ok_or_else(|| {
                PricingError::InvalidConfiguration(
                    "bundle products require a bundle configuration".to_string(),
                )
            })?,
        };

        let price = self
            .catalog
            .calculate_bundle_price(
                tenant,
                query.product_uuid,
                BundlePriceRequest::from(configuration),
            )
            .await?;

        let currency = match price.currency.as_deref().map(str::trim) {
            None | Some("") => self.fallback_currency.clone(),
            Some(code) => Currency::new(code)?,
        };

        Ok((price.total, currency))
    }

    async fn parametric_price(
        &self,
        tenant: TenantUuid,
        query: &PriceQuery,
    ) -> Result<(Decimal, Currency), PricingError> {
        let empty = ParametricConfiguration::default();

        let configuration = match &query.configuration {
            None => &empty,
            Some(configuration) => configuration.as_parametric().ok_or_else(|| {
                PricingError::InvalidConfiguration(
                    "parametric products require a parametric configuration".to_string(),
                )
            })?,
        };

        let price = self
            .catalog
            .calculate_parametric_price(
                tenant,
                query.product_uuid,
                ParametricPriceRequest::new(configuration, query.quantity),
            )
            .await?;

        Ok((price.unit_price, Currency::new(&price.currency)?))
    }
}

#[async_trait]
impl PriceResolver for CatalogPriceResolver {
    #[tracing::instrument(
        name = "catalog.resolve_price",
        skip(self, query),
        fields(product = %query.product_uuid, quantity = query.quantity)
    )]
    async fn resolve_price(
        &self,
        tenant: TenantUuid,
        query: PriceQuery,
    ) -> Result<ResolvedPrice, PricingError> {
        let product = self.catalog.get_product(tenant, query.product_uuid).await?;

        let product_type: ProductType = product
            .product_type
            .parse()
            .map_err(|UnknownProductType(tag)| PricingError::UnknownProductType(tag))?;

        let (unit_price, currency) = match product_type {
            ProductType::Simple | ProductType::Variant => self.tiered_price(tenant, &query).await?,
            ProductType::Bundle => self.bundle_price(tenant, &query).await?,
            ProductType::Parametric => self.parametric_price(tenant, &query).await?,
        };

        Ok(ResolvedPrice {
            unit_price,
            currency,
            product_type,
            details: ProductDetails {
                name: product.name,
                sku: product.sku,
                image_url: product.image_url,
            },
        })
    }
}

#[automock]
#[async_trait]
/// Resolves the unit price of a cart line.
pub trait PriceResolver: Send + Sync {
    /// Price `query.quantity` units of a product with the given configuration.
    async fn resolve_price(
        &self,
        tenant: TenantUuid,
        query: PriceQuery,
    ) -> Result<ResolvedPrice, PricingError>;
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, eq};
    use serde_json::json;
    use testresult::TestResult;

    use crate::catalog::{
        client::MockCatalogClient,
        errors::CatalogError,
        models::{BundlePrice, CatalogPrice, CatalogProduct, ParametricPrice},
    };

    use super::*;

    fn product(product_type: &str) -> CatalogProduct {
        CatalogProduct {
            product_type: product_type.to_string(),
            name: "Desk".to_string(),
            sku: Some("DSK-1".to_string()),
            image_url: None,
        }
    }

    fn tiers() -> Vec<CatalogPrice> {
        [(1, 10), (5, 8), (10, 6)]
            .into_iter()
            .map(|(min_quantity, price)| CatalogPrice {
                min_quantity,
                price: Decimal::from(price),
                currency: "CHF".to_string(),
            })
            .collect()
    }

    fn query(product_uuid: Uuid, quantity: u32, configuration: Option<Configuration>) -> PriceQuery {
        PriceQuery {
            product_uuid,
            variant_uuid: None,
            quantity,
            configuration,
        }
    }

    fn resolver(catalog: MockCatalogClient) -> CatalogPriceResolver {
        CatalogPriceResolver::new(Arc::new(catalog), Currency::default_fallback())
    }

    #[tokio::test]
    async fn simple_products_use_the_matching_tier() -> TestResult {
        let product_uuid = Uuid::now_v7();
        let mut catalog = MockCatalogClient::new();

        catalog
            .expect_get_product()
            .returning(|_, _| Ok(product("simple")));

        catalog
            .expect_get_prices()
            .with(always(), eq(product_uuid), eq(None))
            .returning(|_, _, _| Ok(tiers()));

        let resolver = resolver(catalog);
        let tenant = TenantUuid::new();

        for (quantity, expected) in [(7, 8), (1, 10), (10, 6), (0, 10)] {
            let resolved = resolver
                .resolve_price(tenant, query(product_uuid, quantity, None))
                .await?;

            assert_eq!(
                resolved.unit_price,
                Decimal::from(expected),
                "unexpected unit price for quantity {quantity}"
            );
            assert_eq!(resolved.currency.as_str(), "CHF");
            assert_eq!(resolved.product_type, ProductType::Simple);
            assert_eq!(resolved.details.sku.as_deref(), Some("DSK-1"));
        }

        Ok(())
    }

    #[tokio::test]
    async fn variant_products_fetch_variant_tiers() -> TestResult {
        let product_uuid = Uuid::now_v7();
        let variant_uuid = Uuid::now_v7();
        let mut catalog = MockCatalogClient::new();

        catalog
            .expect_get_product()
            .returning(|_, _| Ok(product("variant")));

        catalog
            .expect_get_prices()
            .with(always(), eq(product_uuid), eq(Some(variant_uuid)))
            .times(1)
            .returning(|_, _, _| Ok(tiers()));

        let resolved = resolver(catalog)
            .resolve_price(
                TenantUuid::new(),
                PriceQuery {
                    variant_uuid: Some(variant_uuid),
                    ..query(product_uuid, 5, None)
                },
            )
            .await?;

        assert_eq!(resolved.unit_price, Decimal::from(8));
        assert_eq!(resolved.product_type, ProductType::Variant);

        Ok(())
    }

    #[tokio::test]
    async fn empty_tier_list_is_price_not_available() {
        let mut catalog = MockCatalogClient::new();

        catalog
            .expect_get_product()
            .returning(|_, _| Ok(product("simple")));

        catalog.expect_get_prices().returning(|_, _, _| Ok(vec![]));

        let result = resolver(catalog)
            .resolve_price(TenantUuid::new(), query(Uuid::now_v7(), 1, None))
            .await;

        assert!(
            matches!(result, Err(PricingError::PriceNotAvailable(_))),
            "expected PriceNotAvailable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn failed_price_fetch_is_price_not_available() {
        let mut catalog = MockCatalogClient::new();

        catalog
            .expect_get_product()
            .returning(|_, _| Ok(product("simple")));

        catalog
            .expect_get_prices()
            .returning(|_, product, _| Err(CatalogError::PriceNotAvailable(product)));

        let result = resolver(catalog)
            .resolve_price(TenantUuid::new(), query(Uuid::now_v7(), 1, None))
            .await;

        assert!(
            matches!(result, Err(PricingError::PriceNotAvailable(_))),
            "expected PriceNotAvailable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn missing_product_is_product_not_found() {
        let mut catalog = MockCatalogClient::new();

        catalog
            .expect_get_product()
            .returning(|_, product| Err(CatalogError::ProductNotFound(product)));

        let result = resolver(catalog)
            .resolve_price(TenantUuid::new(), query(Uuid::now_v7(), 1, None))
            .await;

        assert!(
            matches!(result, Err(PricingError::ProductNotFound(_))),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_product_type_is_rejected() {
        let mut catalog = MockCatalogClient::new();

        catalog
            .expect_get_product()
            .returning(|_, _| Ok(product("subscription")));

        let result = resolver(catalog)
            .resolve_price(TenantUuid::new(), query(Uuid::now_v7(), 1, None))
            .await;

        assert!(
            matches!(result, Err(PricingError::UnknownProductType(ref tag)) if tag == "subscription"),
            "expected UnknownProductType, got {result:?}"
        );
    }

    #[tokio::test]
    async fn bundle_price_is_the_catalog_total_with_fallback_currency() -> TestResult {
        let component = Uuid::now_v7();
        let configuration = Configuration::normalize(&json!({
            "bundleConfig": {
                "components": [{ "componentId": component.to_string(), "quantity": 2 }]
            }
        }))?;

        let mut catalog = MockCatalogClient::new();

        catalog
            .expect_get_product()
            .returning(|_, _| Ok(product("bundle")));

        catalog
            .expect_calculate_bundle_price()
            .withf(move |_, _, request| {
                request.components.len() == 1
                    && request
                        .components
                        .first()
                        .is_some_and(|c| c.component_id == Some(component) && c.quantity == 2)
            })
            .returning(|_, _, _| {
                Ok(BundlePrice {
                    total: Decimal::new(4990, 2),
                    currency: None,
                })
            });

        let resolved = resolver(catalog)
            .resolve_price(TenantUuid::new(), query(Uuid::now_v7(), 1, configuration))
            .await?;

        assert_eq!(resolved.unit_price, Decimal::new(4990, 2));
        assert_eq!(resolved.currency, Currency::default_fallback());
        assert_eq!(resolved.product_type, ProductType::Bundle);

        Ok(())
    }

    #[tokio::test]
    async fn parametric_price_uses_catalog_currency() -> TestResult {
        let configuration = Configuration::normalize(&json!({
            "parameters": { "width": 120 },
            "selections": { "finish": "oak" }
        }))?;

        let mut catalog = MockCatalogClient::new();

        catalog
            .expect_get_product()
            .returning(|_, _| Ok(product("parametric")));

        catalog
            .expect_calculate_parametric_price()
            .withf(|_, _, request| {
                request.quantity == 3
                    && request.selections.get("finish") == Some(&json!("oak"))
                    && request.parameters.get("width") == Some(&json!(120))
            })
            .returning(|_, _, _| {
                Ok(ParametricPrice {
                    unit_price: Decimal::new(31250, 2),
                    currency: "EUR".to_string(),
                })
            });

        let resolved = resolver(catalog)
            .resolve_price(TenantUuid::new(), query(Uuid::now_v7(), 3, configuration))
            .await?;

        assert_eq!(resolved.unit_price, Decimal::new(31250, 2));
        assert_eq!(resolved.currency.as_str(), "EUR");

        Ok(())
    }

    #[tokio::test]
    async fn parametric_configuration_on_bundle_is_invalid() -> TestResult {
        let configuration = Configuration::normalize(&json!({
            "parametric_config": { "parameters": { "width": 120 } }
        }))?;

        let mut catalog = MockCatalogClient::new();

        catalog
            .expect_get_product()
            .returning(|_, _| Ok(product("bundle")));

        catalog.expect_calculate_bundle_price().never();

        let result = resolver(catalog)
            .resolve_price(TenantUuid::new(), query(Uuid::now_v7(), 1, configuration))
            .await;

        assert!(
            matches!(result, Err(PricingError::InvalidConfiguration(_))),
            "expected InvalidConfiguration, got {result:?}"
        );

        Ok(())
    }
}
