//! Order status state machine

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order status errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderStatusError {
    /// The transition is not in the transition table.
    #[error("cannot transition order from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: OrderStatus,

        /// Requested status.
        to: OrderStatus,
    },

    /// Only pending and confirmed orders can be cancelled.
    #[error("order in status {0} cannot be cancelled")]
    CannotBeCancelled(OrderStatus),

    /// The stored status tag is not recognized.
    #[error("unknown order status {0:?}")]
    Unknown(String),
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting confirmation.
    Pending,

    /// Accepted; the status checkout creates orders in.
    Confirmed,

    /// Being prepared.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Cancelled.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Status assigned to orders created by checkout.
    pub const INITIAL: Self = Self::Confirmed;

    /// Tag used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Statuses reachable in one step.
    pub fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Processing, Self::Cancelled],
            Self::Processing => &[Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Delivered],
            Self::Delivered | Self::Cancelled => &[],
        }
    }

    /// Whether `to` is reachable in one step.
    pub fn can_transition_to(self, to: Self) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Whether no further transitions exist.
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Whether a customer may still cancel.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Validates a transition and returns the change to record.
    ///
    /// # Errors
    ///
    /// - [`OrderStatusError::InvalidTransition`]: `to` is not reachable from `self`.
    pub fn transition(self, to: Self) -> Result<StatusChange, OrderStatusError> {
        if !self.can_transition_to(to) {
            return Err(OrderStatusError::InvalidTransition { from: self, to });
        }

        Ok(StatusChange {
            from: Some(self),
            to,
        })
    }

    /// Validates a customer cancellation.
    ///
    /// # Errors
    ///
    /// - [`OrderStatusError::CannotBeCancelled`]: the order is past confirmation.
    pub fn cancel(self) -> Result<StatusChange, OrderStatusError> {
        if !self.is_cancellable() {
            return Err(OrderStatusError::CannotBeCancelled(self));
        }

        self.transition(Self::Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| OrderStatusError::Unknown(s.to_string()))
    }
}

/// A status change to append to an order's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Previous status; `None` only for the creation entry.
    pub from: Option<OrderStatus>,

    /// New status.
    pub to: OrderStatus,
}

impl StatusChange {
    /// The history entry written when an order is created.
    pub fn creation(initial: OrderStatus) -> Self {
        Self {
            from: None,
            to: initial,
        }
    }
}
