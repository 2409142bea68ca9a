//! Catalog Config

use std::time::Duration;

use clap::Args;
use trolley_app::catalog::CatalogConfig;

/// Product catalog settings.
#[derive(Debug, Args)]
pub struct CatalogSettings {
    /// Catalog service base URL
    #[arg(long, env = "CATALOG_URL")]
    pub catalog_url: String,

    /// Catalog request timeout in milliseconds.
    #[arg(long, env = "CATALOG_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub catalog_timeout_ms: u64,
}

impl CatalogSettings {
    /// Client configuration for the catalog.
    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.catalog_url.clone(),
            timeout: Duration::from_millis(self.catalog_timeout_ms),
        }
    }
}
