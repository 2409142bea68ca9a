//! Cancel Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use trolley_app::domain::orders::models::OrderUuid;
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Cancel Order Handler
///
/// Cancels one of the user's orders while it is still pending or confirmed.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    responses(
        (status_code = StatusCode::OK, description = "Cancelled order"),
        (status_code = StatusCode::BAD_REQUEST, description = "Order can no longer be cancelled"),
        (status_code = StatusCode::FORBIDDEN, description = "Order belongs to another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "User required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let user = depot.user_or_401()?;

    let order = state
        .app
        .orders
        .cancel_order(tenant, user, OrderUuid::from_uuid(order.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;
    use trolley::orders::OrderStatus;
    use trolley_app::domain::orders::{MockOrdersService, OrdersServiceError};

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_order, make_service, user_identity};

    use super::*;

    fn service(orders: MockOrdersService) -> Service {
        make_service(
            Mocks::orders(orders),
            user_identity(),
            Router::with_path("orders/{order}/cancel").post(handler),
        )
    }

    #[tokio::test]
    async fn test_cancel_returns_cancelled_order() -> TestResult {
        let mut orders = MockOrdersService::new();
        let uuid = OrderUuid::new();
        let order = make_order(uuid, OrderStatus::Cancelled);

        orders
            .expect_cancel_order()
            .once()
            .withf(move |_, user, order| *user == TEST_USER_UUID && *order == uuid)
            .return_once(move |_, _, _| Ok(order));

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/cancel"))
            .send(&service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Value = res.take_json().await?;

        assert_eq!(body["status"], "cancelled");

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_shipped_order_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_cancel_order().once().return_once(|_, _, _| {
            Err(OrdersServiceError::OrderCannotBeCancelled(
                OrderStatus::Shipped,
            ))
        });

        let mut res = TestClient::post(format!(
            "http://example.com/orders/{}/cancel",
            OrderUuid::new()
        ))
        .send(&service(orders))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(
            res.take_string()
                .await?
                .contains("ORDER_CANNOT_BE_CANCELLED"),
            "expected cancellation error code"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_foreign_order_returns_403() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_cancel_order()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::Forbidden));

        let res = TestClient::post(format!(
            "http://example.com/orders/{}/cancel",
            OrderUuid::new()
        ))
        .send(&service(orders))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
