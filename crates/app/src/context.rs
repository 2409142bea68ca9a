//! App Context

use std::sync::Arc;

use thiserror::Error;
use trolley::currency::Currency;

use crate::{
    catalog::{CatalogConfig, CatalogError, CatalogPriceResolver, HttpCatalogClient},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        orders::{
            CartGateway, CartGatewayError, CartServiceConfig, CheckoutService, HttpCartGateway,
            LocalCartGateway, OrdersService, PgCheckoutService, PgOrdersService,
        },
        tenants::{PgTenantsService, TenantsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("database role bypasses row-level security; connect as a non-superuser role")]
    RlsBypass,

    #[error("failed to build catalog client")]
    Catalog(#[source] CatalogError),

    #[error("failed to build cart service client")]
    CartGateway(#[source] CartGatewayError),
}

/// Everything needed to wire the application services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub catalog: CatalogConfig,

    /// Remote cart service used by checkout. Checkout talks to the in-process carts service
    /// when unset.
    pub cart_service: Option<CartServiceConfig>,

    /// Currency of empty carts and of prices the catalog leaves unspecified.
    pub fallback_currency: Currency,
}

#[derive(Clone)]
pub struct AppContext {
    pub tenants: Arc<dyn TenantsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub checkout: Arc<dyn CheckoutService>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting to the database fails, when the connected role would
    /// bypass row-level security, or when an HTTP client cannot be built.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if database::role_bypasses_rls(&pool)
            .await
            .map_err(AppInitError::Database)?
        {
            return Err(AppInitError::RlsBypass);
        }

        let db = Db::new(pool);

        let catalog = HttpCatalogClient::new(config.catalog).map_err(AppInitError::Catalog)?;
        let resolver = CatalogPriceResolver::new(Arc::new(catalog), config.fallback_currency.clone());

        let carts: Arc<dyn CartsService> = Arc::new(PgCartsService::new(
            db.clone(),
            Arc::new(resolver),
            config.fallback_currency.clone(),
        ));

        let gateway: Arc<dyn CartGateway> = match config.cart_service {
            Some(cart_service) => Arc::new(
                HttpCartGateway::new(cart_service).map_err(AppInitError::CartGateway)?,
            ),
            None => Arc::new(LocalCartGateway::new(carts.clone())),
        };

        Ok(Self {
            tenants: Arc::new(PgTenantsService::new(db.clone())),
            carts,
            orders: Arc::new(PgOrdersService::new(db.clone())),
            checkout: Arc::new(PgCheckoutService::new(
                db,
                gateway,
                config.fallback_currency,
            )),
        })
    }
}
