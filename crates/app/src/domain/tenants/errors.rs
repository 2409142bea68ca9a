//! Tenants service errors.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Failures surfaced by tenant operations.
#[derive(Debug, Error)]
pub enum TenantsServiceError {
    /// A tenant with the same UUID is already registered.
    #[error("tenant already exists")]
    AlreadyExists,

    /// No tenant is registered under the UUID.
    #[error("tenant not found")]
    NotFound,

    /// A required column was null.
    #[error("missing required tenant data")]
    MissingRequiredData,

    /// The tenant was rejected by validation or a check constraint, e.g. a blank name.
    #[error("invalid tenant data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for TenantsServiceError {
    fn from(error: sqlx::Error) -> Self {
        let kind = match &error {
            sqlx::Error::RowNotFound => return Self::NotFound,
            sqlx::Error::Database(database_error) => database_error.kind(),
            _ => return Self::Sql(error),
        };

        match kind {
            ErrorKind::UniqueViolation => Self::AlreadyExists,
            ErrorKind::NotNullViolation => Self::MissingRequiredData,
            ErrorKind::CheckViolation => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
