//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    carts::{CartLine, CartStatus, CartStatusError, LineKey},
    configuration::{
        BundleConfiguration, ComponentSelection, Configuration, ConfigurationError, Fingerprint,
        ParameterMap, ParametricConfiguration,
    },
    currency::{Currency, CurrencyError, DEFAULT_CURRENCY_CODE},
    orders::{OrderNumber, OrderStatus, OrderStatusError, OrderTotals, StatusChange},
    pricing::{PriceTier, PricedLine, Totals, line_total, select_tier},
    products::{ProductType, UnknownProductType},
};
