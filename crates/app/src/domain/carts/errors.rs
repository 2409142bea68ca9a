//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use trolley::carts::{CartStatus, CartStatusError};

use crate::catalog::PricingError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("a user or session identity is required")]
    MissingIdentity,

    #[error("cart not found")]
    NotFound,

    #[error("cart item not found")]
    ItemNotFound,

    #[error("cart is {0}, not active")]
    CartNotActive(CartStatus),

    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    #[error("could not price item")]
    Pricing(#[from] PricingError),

    #[error("cart already exists")]
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

impl From<CartStatusError> for CartsServiceError {
    fn from(error: CartStatusError) -> Self {
        match error {
            CartStatusError::NotActive(status) => Self::CartNotActive(status),
            CartStatusError::Unknown(_) => Self::InvalidData,
        }
    }
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
