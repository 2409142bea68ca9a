use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{
        carts::{
            CartsService,
            models::{Cart, CartUuid, CartValidation},
        },
        orders::gateways::{CartGateway, CartGatewayError},
        tenants::models::TenantUuid,
    },
    identity::Identity,
};

/// Gateway to a carts service running in the same process.
#[derive(Clone)]
pub struct LocalCartGateway {
    carts: Arc<dyn CartsService>,
}

impl LocalCartGateway {
    #[must_use]
    pub fn new(carts: Arc<dyn CartsService>) -> Self {
        Self { carts }
    }
}

#[async_trait]
impl CartGateway for LocalCartGateway {
    async fn fetch_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<Cart, CartGatewayError> {
        Ok(self.carts.get_active_cart(tenant, identity).await?)
    }

    async fn validate_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<CartValidation, CartGatewayError> {
        Ok(self.carts.validate_cart(tenant, identity).await?)
    }

    async fn complete_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        cart: CartUuid,
    ) -> Result<(), CartGatewayError> {
        self.carts.complete_cart(tenant, identity, cart).await?;

        Ok(())
    }
}
