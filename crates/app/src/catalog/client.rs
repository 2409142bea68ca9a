//! Catalog HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    catalog::{
        errors::CatalogError,
        models::{
            BundlePrice, BundlePriceRequest, CatalogPrice, CatalogProduct, ParametricPrice,
            ParametricPriceRequest,
        },
    },
    domain::tenants::models::TenantUuid,
    identity::TENANT_HEADER,
};

/// Configuration for connecting to the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog base URL, e.g. `"http://catalog:8080"`.
    pub base_url: String,

    /// Upper bound on every catalog request.
    pub timeout: Duration,
}

/// HTTP client for the product catalog.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    base_url: String,
    http: Client,
}

impl HttpCatalogClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(tenant: TenantUuid, request: RequestBuilder) -> Result<Response, CatalogError> {
        Ok(request
            .header(TENANT_HEADER, tenant.to_string())
            .send()
            .await?)
    }

    /// Decodes a successful response, or reports `otherwise` for any non-success status.
    async fn decode<T: DeserializeOwned>(
        response: Response,
        otherwise: CatalogError,
    ) -> Result<T, CatalogError> {
        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), error = %otherwise, "catalog request rejected");

            return Err(otherwise);
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn get_product(
        &self,
        tenant: TenantUuid,
        product: Uuid,
    ) -> Result<CatalogProduct, CatalogError> {
        let request = self.http.get(self.url(&format!("/products/{product}")));
        let response = Self::send(tenant, request).await?;

        Self::decode(response, CatalogError::ProductNotFound(product)).await
    }

    async fn get_prices(
        &self,
        tenant: TenantUuid,
        product: Uuid,
        variant: Option<Uuid>,
    ) -> Result<Vec<CatalogPrice>, CatalogError> {
        let mut request = self
            .http
            .get(self.url(&format!("/products/{product}/prices")));

        if let Some(variant) = variant {
            request = request.query(&[("variant_id", variant.to_string())]);
        }

        let response = Self::send(tenant, request).await?;

        Self::decode(response, CatalogError::PriceNotAvailable(product)).await
    }

    async fn calculate_bundle_price(
        &self,
        tenant: TenantUuid,
        bundle: Uuid,
        request: BundlePriceRequest,
    ) -> Result<BundlePrice, CatalogError> {
        let request = self
            .http
            .post(self.url(&format!("/bundles/{bundle}/calculate-price")))
            .json(&request);

        let response = Self::send(tenant, request).await?;

        Self::decode(response, CatalogError::PriceNotAvailable(bundle)).await
    }

    async fn calculate_parametric_price(
        &self,
        tenant: TenantUuid,
        product: Uuid,
        request: ParametricPriceRequest,
    ) -> Result<ParametricPrice, CatalogError> {
        let request = self
            .http
            .post(self.url(&format!("/products/{product}/calculate-price")))
            .json(&request);

        let response = Self::send(tenant, request).await?;

        Self::decode(response, CatalogError::PriceNotAvailable(product)).await
    }
}

#[automock]
#[async_trait]
/// Product catalog operations used for pricing.
pub trait CatalogClient: Send + Sync {
    /// Fetch a product's type and display fields.
    async fn get_product(
        &self,
        tenant: TenantUuid,
        product: Uuid,
    ) -> Result<CatalogProduct, CatalogError>;

    /// Fetch the price tiers of a product or one of its variants.
    async fn get_prices(
        &self,
        tenant: TenantUuid,
        product: Uuid,
        variant: Option<Uuid>,
    ) -> Result<Vec<CatalogPrice>, CatalogError>;

    /// Price a bundle with the given component selections.
    async fn calculate_bundle_price(
        &self,
        tenant: TenantUuid,
        bundle: Uuid,
        request: BundlePriceRequest,
    ) -> Result<BundlePrice, CatalogError>;

    /// Price a parametric product with the given parameters and selections.
    async fn calculate_parametric_price(
        &self,
        tenant: TenantUuid,
        product: Uuid,
        request: ParametricPriceRequest,
    ) -> Result<ParametricPrice, CatalogError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() -> TestResult {
        let client = HttpCatalogClient::new(CatalogConfig {
            base_url: "http://catalog.local/".to_string(),
            timeout: Duration::from_secs(2),
        })?;

        assert_eq!(
            client.url("/products/1"),
            "http://catalog.local/products/1"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_catalog_is_a_transport_error() -> TestResult {
        let client = HttpCatalogClient::new(CatalogConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(200),
        })?;

        let result = client.get_product(TenantUuid::new(), Uuid::now_v7()).await;

        assert!(
            matches!(result, Err(CatalogError::Http(_))),
            "expected transport error, got {result:?}"
        );

        Ok(())
    }
}
