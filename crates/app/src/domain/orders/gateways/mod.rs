//! Cart gateways
//!
//! Checkout reads and completes carts through a [`CartGateway`], either in-process or against a
//! separately deployed cart service.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{
    domain::{
        carts::{
            CartsServiceError,
            models::{Cart, CartUuid, CartValidation},
        },
        tenants::models::TenantUuid,
    },
    identity::Identity,
};

mod http;
mod local;

pub use http::{CartServiceConfig, HttpCartGateway};
pub use local::LocalCartGateway;

#[derive(Debug, Error)]
pub enum CartGatewayError {
    #[error("cart not found")]
    NotFound,

    #[error("cart service rejected the request: {0}")]
    Rejected(String),

    #[error(transparent)]
    Cart(#[from] CartsServiceError),

    #[error("cart service request failed")]
    Http(#[from] reqwest::Error),
}

impl CartGatewayError {
    /// Whether the error means the cart does not exist, however it was reached.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound | Self::Cart(CartsServiceError::NotFound))
    }
}

#[automock]
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Fetch the caller's active cart.
    async fn fetch_cart(&self, tenant: TenantUuid, identity: Identity)
    -> Result<Cart, CartGatewayError>;

    /// Re-price the caller's active cart.
    async fn validate_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
    ) -> Result<CartValidation, CartGatewayError>;

    /// Mark a cart as completed.
    async fn complete_cart(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        cart: CartUuid,
    ) -> Result<(), CartGatewayError>;
}
