//! Cart service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use trolley::{
    carts::CartStatus, configuration::Configuration, currency::Currency, products::ProductType,
};
use uuid::Uuid;

use crate::{
    domain::{
        carts::models::{Cart, CartItem, CartItemUuid, CartUuid, CartValidation, SkippedItem},
        orders::gateways::{CartGateway, CartGatewayError},
        tenants::models::TenantUuid,
    },
    identity::{Identity, SESSION_HEADER, SessionUuid, TENANT_HEADER, USER_HEADER, UserUuid},
};

/// Configuration for reaching a remote cart service.
#[derive(Debug, Clone)]
pub struct CartServiceConfig {
    /// Cart service base URL, e.g. `"http://carts:8698"`.
    pub base_url: String,

    /// Upper bound on every cart service request.
    pub timeout: Duration,
}

/// Gateway to a cart service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCartGateway {
    base_url: String,
    http: Client,
}

impl HttpCartGateway {
    /// Create a new gateway from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: CartServiceConfig) -> Result<Self, CartGatewayError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        tenant: TenantUuid,
        identity: Identity,
        mut request: RequestBuilder,
    ) -> Result<Response, CartGatewayError> {
        request = request.header(TENANT_HEADER, tenant.to_string());

        if let Some(user) = identity.user {
            request = request.header(USER_HEADER, user.to_string());
        }

        if let Some(session) = identity.session {
            request = request.header(SESSION_HEADER, session.to_string());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CartGatewayError::NotFound);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            tracing::debug!(%status, body, "cart service request rejected");

            return Err(CartGatewayError::Rejected(format!("{status}: {body}")));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CartGatewayError> {
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CartGateway for HttpCartGateway {
    async fn fetch_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<Cart, CartGatewayError> {
        let request = self.http.get(self.url("/cart"));
        let response = Self::send(tenant, identity, request).await?;

        Ok(Self::decode::<CartPayload>(response).await?.into())
    }

    async fn validate_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<CartValidation, CartGatewayError> {
        let request = self.http.post(self.url("/cart/validate"));
        let response = Self::send(tenant, identity, request).await?;

        Ok(Self::decode::<CartValidationPayload>(response).await?.into())
    }

    async fn complete_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        cart: CartUuid,
    ) -> Result<(), CartGatewayError> {
        let request = self
            .http
            .post(self.url("/cart/complete"))
            .json(&CompleteCartPayload {
                cart_id: cart.into_uuid(),
            });

        Self::send(tenant, identity, request).await?;

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CompleteCartPayload {
    cart_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct CartPayload {
    id: Uuid,
    user_id: Option<Uuid>,
    session_id: Option<Uuid>,
    status: CartStatus,
    subtotal: Decimal,
    currency: Currency,
    items: Vec<CartItemPayload>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
struct CartItemPayload {
    id: Uuid,
    cart_id: Uuid,
    product_id: Uuid,
    variant_id: Option<Uuid>,
    product_type: ProductType,
    name: String,
    sku: Option<String>,
    image_url: Option<String>,
    quantity: u32,
    unit_price: Decimal,
    currency: Currency,
    configuration: Option<Configuration>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
struct CartValidationPayload {
    cart: CartPayload,

    #[serde(default)]
    skipped: Vec<SkippedItemPayload>,
}

#[derive(Debug, Deserialize)]
struct SkippedItemPayload {
    item_id: Uuid,
    product_id: Uuid,
    reason: String,
}

impl From<CartPayload> for Cart {
    fn from(payload: CartPayload) -> Self {
        Self {
            uuid: CartUuid::from_uuid(payload.id),
            user_uuid: payload.user_id.map(UserUuid::from_uuid),
            session_uuid: payload.session_id.map(SessionUuid::from_uuid),
            status: payload.status,
            subtotal: payload.subtotal,
            currency: payload.currency,
            items: payload.items.into_iter().map(CartItem::from).collect(),
            created_at: payload.created_at,
            updated_at: payload.updated_at,
        }
    }
}

impl From<CartItemPayload> for CartItem {
    fn from(payload: CartItemPayload) -> Self {
        Self {
            uuid: CartItemUuid::from_uuid(payload.id),
            cart_uuid: CartUuid::from_uuid(payload.cart_id),
            product_uuid: payload.product_id,
            variant_uuid: payload.variant_id,
            product_type: payload.product_type,
            name: payload.name,
            sku: payload.sku,
            image_url: payload.image_url,
            quantity: payload.quantity,
            unit_price: payload.unit_price,
            currency: payload.currency,
            configuration: payload.configuration,
            created_at: payload.created_at,
            updated_at: payload.updated_at,
        }
    }
}

impl From<CartValidationPayload> for CartValidation {
    fn from(payload: CartValidationPayload) -> Self {
        Self {
            cart: payload.cart.into(),
            skipped: payload
                .skipped
                .into_iter()
                .map(|skipped| SkippedItem {
                    item_uuid: CartItemUuid::from_uuid(skipped.item_id),
                    product_uuid: skipped.product_id,
                    reason: skipped.reason,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn cart_payload_converts_into_cart() -> TestResult {
        let cart_id = Uuid::now_v7();
        let product_id = Uuid::now_v7();

        let payload: CartValidationPayload = serde_json::from_value(json!({
            "cart": {
                "id": cart_id,
                "user_id": null,
                "session_id": Uuid::now_v7(),
                "status": "active",
                "subtotal": "20.00",
                "currency": "CHF",
                "items": [{
                    "id": Uuid::now_v7(),
                    "cart_id": cart_id,
                    "product_id": product_id,
                    "variant_id": null,
                    "product_type": "parametric",
                    "name": "Desk",
                    "sku": "DESK-1",
                    "image_url": null,
                    "quantity": 2,
                    "unit_price": "10.00",
                    "total_price": "20.00",
                    "currency": "CHF",
                    "configuration": { "kind": "parametric", "selections": { "top": "oak" } },
                    "created_at": "2026-03-01T10:00:00Z",
                    "updated_at": "2026-03-01T10:00:00Z"
                }],
                "created_at": "2026-03-01T10:00:00Z",
                "updated_at": "2026-03-01T10:00:00Z"
            },
            "skipped": [{ "item_id": Uuid::now_v7(), "product_id": product_id, "reason": "gone" }]
        }))?;

        let validation = CartValidation::from(payload);
        let item = validation.cart.items.first().ok_or("one item")?;

        assert_eq!(validation.cart.uuid.into_uuid(), cart_id);
        assert_eq!(validation.cart.status, CartStatus::Active);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price, Decimal::TEN);
        assert_eq!(item.product_type, ProductType::Parametric);
        assert!(matches!(
            item.configuration,
            Some(Configuration::Parametric(_))
        ));
        assert_eq!(validation.skipped.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_cart_service_is_a_transport_error() -> TestResult {
        let gateway = HttpCartGateway::new(CartServiceConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            timeout: Duration::from_millis(200),
        })?;

        assert_eq!(gateway.url("/cart"), "http://127.0.0.1:9/cart");

        let result = gateway
            .fetch_cart(TenantUuid::new(), Identity::user(UserUuid::new()))
            .await;

        assert!(
            matches!(result, Err(CartGatewayError::Http(_))),
            "expected transport error, got {result:?}"
        );

        Ok(())
    }
}
