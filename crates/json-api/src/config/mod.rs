//! Server configuration module

use clap::Parser;
use trolley_app::context::AppConfig;

use crate::config::{
    catalog::CatalogSettings,
    checkout::CheckoutSettings,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod catalog;
pub(crate) mod checkout;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// Trolley JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "trolley-json", about = "Trolley JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Product catalog settings.
    #[command(flatten)]
    pub catalog: CatalogSettings,

    /// Checkout settings.
    #[command(flatten)]
    pub checkout: CheckoutSettings,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings for wiring the application services.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database.database_url.clone(),
            catalog: self.catalog.catalog_config(),
            cart_service: self.checkout.cart_service_config(),
            fallback_currency: self.checkout.fallback_currency.clone(),
        }
    }
}
