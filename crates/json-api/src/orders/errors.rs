//! Errors

use salvo::http::StatusError;
use tracing::error;
use trolley_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::MissingUser => StatusError::unauthorized()
            .brief("A logged-in user is required")
            .detail("USER_REQUIRED"),
        OrdersServiceError::CartNotFound => StatusError::not_found()
            .brief("Cart not found")
            .detail("CART_NOT_FOUND"),
        OrdersServiceError::CartEmpty => StatusError::bad_request()
            .brief("Cart is empty")
            .detail("CART_EMPTY"),
        OrdersServiceError::CartAlreadyOrdered => StatusError::conflict()
            .brief("Cart has already been checked out")
            .detail("CART_ALREADY_CHECKED_OUT"),
        OrdersServiceError::CartValidationFailed(source) => StatusError::bad_request()
            .brief(format!("Cart validation failed: {source}"))
            .detail("CART_VALIDATION_FAILED"),
        OrdersServiceError::Gateway(source) => {
            error!("cart service unavailable: {source}");

            StatusError::internal_server_error()
                .brief("Cart service unavailable")
                .detail("CART_SERVICE_UNAVAILABLE")
        }
        OrdersServiceError::NotFound => StatusError::not_found()
            .brief("Order not found")
            .detail("ORDER_NOT_FOUND"),
        OrdersServiceError::Forbidden => StatusError::forbidden()
            .brief("Order belongs to another user")
            .detail("FORBIDDEN"),
        OrdersServiceError::OrderCannotBeCancelled(status) => StatusError::bad_request()
            .brief(format!("Order in status {status} cannot be cancelled"))
            .detail("ORDER_CANNOT_BE_CANCELLED"),
        OrdersServiceError::InvalidStatusTransition { from, to } => StatusError::bad_request()
            .brief(format!("Cannot transition order from {from} to {to}"))
            .detail("INVALID_STATUS_TRANSITION"),
        OrdersServiceError::AlreadyExists => StatusError::conflict()
            .brief("Order already exists")
            .detail("ORDER_CONFLICT"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => StatusError::bad_request()
            .brief("Invalid order data")
            .detail("INVALID_ORDER_DATA"),
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
