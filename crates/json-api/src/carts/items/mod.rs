//! Cart item surface.

use salvo::http::StatusError;

pub(crate) mod handlers;

/// Converts a client-supplied quantity, rejecting anything that is not a positive `u32`.
pub(crate) fn quantity(value: i64) -> Result<u32, StatusError> {
    u32::try_from(value)
        .ok()
        .filter(|quantity| *quantity > 0)
        .ok_or_else(|| {
            StatusError::bad_request()
                .brief("Quantity must be a positive integer")
                .detail("INVALID_QUANTITY")
        })
}
