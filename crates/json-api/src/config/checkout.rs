//! Checkout Config

use std::time::Duration;

use clap::Args;
use trolley::currency::Currency;
use trolley_app::domain::orders::CartServiceConfig;

/// Checkout settings.
#[derive(Debug, Args)]
pub struct CheckoutSettings {
    /// Remote cart service base URL; checkout uses the in-process carts when unset.
    #[arg(long, env = "CART_SERVICE_URL")]
    pub cart_service_url: Option<String>,

    /// Cart service request timeout in milliseconds.
    #[arg(long, env = "CART_SERVICE_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub cart_service_timeout_ms: u64,

    /// Currency of empty carts and of catalog prices without one (ISO 4217).
    #[arg(long, env = "FALLBACK_CURRENCY", default_value = "CHF")]
    pub fallback_currency: Currency,
}

impl CheckoutSettings {
    /// Client configuration for the remote cart service, if one is configured.
    #[must_use]
    pub fn cart_service_config(&self) -> Option<CartServiceConfig> {
        self.cart_service_url
            .as_ref()
            .filter(|url| !url.trim().is_empty())
            .map(|base_url| CartServiceConfig {
                base_url: base_url.clone(),
                timeout: Duration::from_millis(self.cart_service_timeout_ms),
            })
    }
}
