//! Currencies

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rusty_money::iso;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency used when neither the cart nor the catalog supplies one.
pub const DEFAULT_CURRENCY_CODE: &str = "CHF";

/// Errors raised while parsing a currency code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// The code is not a known ISO 4217 currency.
    #[error("unknown currency code {0:?}")]
    Unknown(String),
}

/// An ISO 4217 currency code, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Parses and validates a currency code. Surrounding whitespace and case are ignored.
    ///
    /// # Errors
    ///
    /// - [`CurrencyError::Unknown`]: the code is not an ISO 4217 currency.
    pub fn new(code: &str) -> Result<Self, CurrencyError> {
        let code = code.trim().to_ascii_uppercase();

        if iso::find(&code).is_none() {
            return Err(CurrencyError::Unknown(code));
        }

        Ok(Self(code))
    }

    /// The default fallback currency.
    pub fn default_fallback() -> Self {
        Self(DEFAULT_CURRENCY_CODE.to_string())
    }

    /// Returns the currency code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of minor unit digits for the currency, e.g. `2` for CHF.
    pub fn exponent(&self) -> u32 {
        iso::find(&self.0).map_or(2, |currency| currency.exponent)
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = CurrencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}
