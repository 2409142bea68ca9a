//! Order numbers

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Human-readable order number, `ORD-YYYYMMDD-NNNN`.
///
/// The sequence restarts at 1 every day for every tenant. It is zero-padded to four digits and
/// widens past 9999 rather than wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Formats the order number for the `sequence`-th order placed on `date`.
    pub fn new(date: Date, sequence: u32) -> Self {
        Self(format!(
            "ORD-{:04}{:02}{:02}-{sequence:04}",
            date.year(),
            date.month(),
            date.day()
        ))
    }

    /// Wraps an order number read from storage.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// The formatted order number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<OrderNumber> for String {
    fn from(value: OrderNumber) -> Self {
        value.0
    }
}
