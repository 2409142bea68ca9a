//! Orders service errors.

use sqlx::{Error, error::ErrorKind};
use thiserror::Error;
use trolley::orders::{OrderStatus, OrderStatusError};

use crate::domain::orders::gateways::CartGatewayError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("checkout requires a logged-in user")]
    MissingUser,

    #[error("cart not found")]
    CartNotFound,

    #[error("cart is empty")]
    CartEmpty,

    #[error("cart has already been checked out")]
    CartAlreadyOrdered,

    #[error("cart validation failed")]
    CartValidationFailed(#[source] CartGatewayError),

    #[error("cart service unavailable")]
    Gateway(#[source] CartGatewayError),

    #[error("order not found")]
    NotFound,

    #[error("order belongs to another user")]
    Forbidden,

    #[error("order in status {0} cannot be cancelled")]
    OrderCannotBeCancelled(OrderStatus),

    #[error("cannot transition order from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<OrderStatusError> for OrdersServiceError {
    fn from(error: OrderStatusError) -> Self {
        match error {
            OrderStatusError::InvalidTransition { from, to } => {
                Self::InvalidStatusTransition { from, to }
            }
            OrderStatusError::CannotBeCancelled(status) => Self::OrderCannotBeCancelled(status),
            OrderStatusError::Unknown(_) => Self::InvalidData,
        }
    }
}

/// Unique index allowing one order per cart.
const ORDERS_CART_UNIQUE: &str = "orders_cart_unique";

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        let kind = database_error.kind();
        let cart_taken = database_error.constraint() == Some(ORDERS_CART_UNIQUE);

        match kind {
            ErrorKind::UniqueViolation if cart_taken => Self::CartAlreadyOrdered,
            ErrorKind::UniqueViolation => Self::AlreadyExists,
            ErrorKind::ForeignKeyViolation => Self::InvalidReference,
            ErrorKind::NotNullViolation => Self::MissingRequiredData,
            ErrorKind::CheckViolation => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
