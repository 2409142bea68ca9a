//! Errors

use salvo::http::StatusError;
use tracing::error;
use trolley_app::{catalog::PricingError, domain::carts::CartsServiceError};

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::MissingIdentity => StatusError::unauthorized()
            .brief("A user or session identifier is required")
            .detail("MISSING_IDENTITY"),
        CartsServiceError::NotFound => StatusError::not_found()
            .brief("Cart not found")
            .detail("CART_NOT_FOUND"),
        CartsServiceError::ItemNotFound => StatusError::not_found()
            .brief("Cart item not found")
            .detail("CART_ITEM_NOT_FOUND"),
        CartsServiceError::CartNotActive(status) => StatusError::bad_request()
            .brief(format!("Cart is {status}, not active"))
            .detail("CART_NOT_ACTIVE"),
        CartsServiceError::InvalidQuantity => StatusError::bad_request()
            .brief("Quantity must be a positive integer")
            .detail("INVALID_QUANTITY"),
        CartsServiceError::Pricing(source) => pricing_status_error(source),
        CartsServiceError::AlreadyExists => StatusError::conflict()
            .brief("Cart already exists")
            .detail("CART_CONFLICT"),
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => StatusError::bad_request()
            .brief("Invalid cart data")
            .detail("INVALID_CART_DATA"),
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

fn pricing_status_error(error: PricingError) -> StatusError {
    match error {
        PricingError::ProductNotFound(_) => StatusError::not_found()
            .brief(error.to_string())
            .detail("PRODUCT_NOT_FOUND"),
        PricingError::PriceNotAvailable(_) => StatusError::bad_request()
            .brief(error.to_string())
            .detail("PRICE_NOT_AVAILABLE"),
        PricingError::UnknownProductType(_) => StatusError::bad_request()
            .brief(error.to_string())
            .detail("UNKNOWN_PRODUCT_TYPE"),
        PricingError::InvalidCurrency(source) => {
            error!("catalog returned an invalid currency: {source}");

            StatusError::internal_server_error()
                .brief("Catalog returned an invalid currency")
                .detail("INVALID_CATALOG_CURRENCY")
        }
        PricingError::InvalidConfiguration(_) => StatusError::bad_request()
            .brief(error.to_string())
            .detail("INVALID_CONFIGURATION"),
        PricingError::Catalog(source) => {
            error!("catalog unavailable: {source}");

            StatusError::internal_server_error()
                .brief("Catalog unavailable")
                .detail("CATALOG_UNAVAILABLE")
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use trolley::{carts::CartStatus, currency::CurrencyError};
    use uuid::Uuid;

    use super::*;

    #[test]
    fn not_active_cart_is_a_bad_request() {
        let status = into_status_error(CartsServiceError::CartNotActive(CartStatus::Completed));

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(status.detail.as_deref(), Some("CART_NOT_ACTIVE"));
    }

    #[test]
    fn unknown_product_is_not_found() {
        let status = into_status_error(CartsServiceError::Pricing(
            PricingError::ProductNotFound(Uuid::now_v7()),
        ));

        assert_eq!(status.code, StatusCode::NOT_FOUND);
        assert_eq!(status.detail.as_deref(), Some("PRODUCT_NOT_FOUND"));
    }

    #[test]
    fn bad_configuration_is_a_bad_request() {
        let status = into_status_error(CartsServiceError::Pricing(
            PricingError::InvalidConfiguration("missing selections".to_string()),
        ));

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(status.detail.as_deref(), Some("INVALID_CONFIGURATION"));
    }

    #[test]
    fn unpriceable_product_type_has_its_own_code() {
        let status = into_status_error(CartsServiceError::Pricing(
            PricingError::UnknownProductType("subscription".to_string()),
        ));

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(status.detail.as_deref(), Some("UNKNOWN_PRODUCT_TYPE"));
        assert!(status.brief.contains("subscription"), "brief names the type");
    }

    #[test]
    fn invalid_catalog_currency_is_a_server_error() {
        let status = into_status_error(CartsServiceError::Pricing(PricingError::InvalidCurrency(
            CurrencyError::Unknown("XYZ".to_string()),
        )));

        assert_eq!(status.code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status.detail.as_deref(), Some("INVALID_CATALOG_CURRENCY"));
    }
}
