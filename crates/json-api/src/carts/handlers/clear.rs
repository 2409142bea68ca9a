//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Clear Cart Handler
///
/// Removes every item from the caller's active cart.
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    responses(
        (status_code = StatusCode::OK, description = "Emptied cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart not active"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing identity"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let identity = depot.identity_or_401()?;

    let cart = state
        .app
        .carts
        .clear_cart(tenant, identity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;
    use trolley::carts::CartStatus;
    use trolley_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{Mocks, make_cart, make_service, user_identity};

    use super::*;

    fn service(carts: MockCartsService) -> Service {
        make_service(
            Mocks::carts(carts),
            user_identity(),
            Router::with_path("cart").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_clear_returns_empty_cart() -> TestResult {
        let mut carts = MockCartsService::new();
        let cart = make_cart(user_identity(), &[]);

        carts
            .expect_clear_cart()
            .once()
            .withf(|_, identity| *identity == user_identity())
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::delete("http://example.com/cart")
            .send(&service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Value = res.take_json().await?;

        assert_eq!(body["items"], Value::Array(Vec::new()));
        assert_eq!(body["subtotal"], "0.00");

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_completed_cart_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .return_once(|_, _| Err(CartsServiceError::CartNotActive(CartStatus::Completed)));

        let res = TestClient::delete("http://example.com/cart")
            .send(&service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
