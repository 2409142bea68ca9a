//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

/// Map errors to HTTP errors.
pub(crate) trait ResultExt<T> {
    /// Any error becomes a logged internal server error.
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    /// Any error becomes a bad request carrying the error message and `code`.
    fn or_400(self, code: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }

    fn or_400(self, code: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            StatusError::bad_request()
                .brief(error.to_string())
                .detail(code)
        })
    }
}
