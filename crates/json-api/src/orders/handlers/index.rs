//! List Orders Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use trolley::orders::OrderStatus;
use trolley_app::domain::orders::models::{DEFAULT_PER_PAGE, OrderFilter};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderPageResponse},
    state::State,
};

/// List Orders Handler
///
/// Lists the user's orders, newest first. `page` starts at 1; `per_page` is capped at 100.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    responses(
        (status_code = StatusCode::OK, description = "A page of orders"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status filter"),
        (status_code = StatusCode::UNAUTHORIZED, description = "User required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrderPageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let user = depot.user_or_401()?;

    let status = status
        .into_inner()
        .filter(|status| !status.is_empty())
        .map(|status| status.parse::<OrderStatus>())
        .transpose()
        .or_400("INVALID_STATUS")?;

    let filter = OrderFilter {
        status,
        page: page.into_inner().unwrap_or(1),
        per_page: per_page.into_inner().unwrap_or(DEFAULT_PER_PAGE),
    };

    let page = state
        .app
        .orders
        .list_orders(tenant, user, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;
    use trolley::orders::OrderNumber;
    use trolley_app::{
        domain::orders::{
            MockOrdersService,
            models::{OrderPage, OrderSummary, OrderUuid},
        },
        identity::Identity,
    };

    use crate::test_helpers::{
        Mocks, TEST_USER_UUID, chf, guest_identity, make_service, user_identity,
    };

    use super::*;

    fn service(orders: MockOrdersService, identity: Identity) -> Service {
        make_service(
            Mocks::orders(orders),
            identity,
            Router::with_path("orders").get(handler),
        )
    }

    fn summary() -> OrderSummary {
        OrderSummary {
            uuid: OrderUuid::new(),
            order_number: OrderNumber::from_stored("ORD-20261018-0003".to_string()),
            status: OrderStatus::Shipped,
            total: Decimal::new(995, 1),
            currency: chf(),
            item_count: 3,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_index_forwards_filter_and_returns_page() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|_, user, filter| {
                *user == TEST_USER_UUID
                    && *filter
                        == OrderFilter {
                            status: Some(OrderStatus::Shipped),
                            page: 2,
                            per_page: 5,
                        }
            })
            .return_once(|_, _, filter| {
                Ok(OrderPage {
                    orders: vec![summary()],
                    total: 6,
                    page: filter.page,
                    per_page: filter.per_page,
                })
            });

        let mut res = TestClient::get("http://example.com/orders?status=shipped&page=2&per_page=5")
            .send(&service(orders, user_identity()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Value = res.take_json().await?;

        assert_eq!(body["total"], 6);
        assert_eq!(body["page"], 2);
        assert_eq!(body["orders"][0]["total"], "99.50");
        assert_eq!(body["orders"][0]["item_count"], 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_defaults_to_first_page() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|_, _, filter| *filter == OrderFilter::default())
            .return_once(|_, _, filter| {
                Ok(OrderPage {
                    orders: Vec::new(),
                    total: 0,
                    page: filter.page,
                    per_page: filter.per_page,
                })
            });

        let res = TestClient::get("http://example.com/orders")
            .send(&service(orders, user_identity()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/orders?status=lost")
            .send(&service(orders, user_identity()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_guest_returns_401() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/orders")
            .send(&service(orders, guest_identity()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
