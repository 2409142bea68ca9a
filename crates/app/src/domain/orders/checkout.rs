//! Checkout
//!
//! Turns the caller's active cart into an order: fetch and validate the cart through a
//! [`CartGateway`], freeze its items and totals under a fresh order number, then mark the cart
//! completed.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Timestamp, tz::TimeZone};
use mockall::automock;
use tracing::{debug, warn};
use trolley::{
    currency::Currency,
    orders::{OrderNumber, OrderStatus, OrderTotals, StatusChange},
};

use crate::{
    database::Db,
    domain::{
        carts::models::CartValidation,
        orders::{
            errors::OrdersServiceError,
            gateways::{CartGateway, CartGatewayError},
            models::{CheckoutDetails, Order},
            repositories::{
                NewOrderRow, PgOrderItemsRepository, PgOrderStatusLogsRepository,
                PgOrdersRepository, load_order,
            },
        },
        tenants::models::TenantUuid,
    },
    identity::Identity,
};

fn fetch_error(error: CartGatewayError) -> OrdersServiceError {
    if error.is_not_found() {
        OrdersServiceError::CartNotFound
    } else {
        OrdersServiceError::Gateway(error)
    }
}

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    gateway: Arc<dyn CartGateway>,
    fallback_currency: Currency,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    logs_repository: PgOrderStatusLogsRepository,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, gateway: Arc<dyn CartGateway>, fallback_currency: Currency) -> Self {
        Self {
            db,
            gateway,
            fallback_currency,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            logs_repository: PgOrderStatusLogsRepository::new(),
        }
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(name = "orders.checkout", skip(self, details))]
    async fn checkout(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        details: CheckoutDetails,
    ) -> Result<Order, OrdersServiceError> {
        let user = identity.user.ok_or(OrdersServiceError::MissingUser)?;

        let cart = self
            .gateway
            .fetch_cart(tenant, identity)
            .await
            .map_err(fetch_error)?;

        if cart.items.is_empty() {
            return Err(OrdersServiceError::CartEmpty);
        }

        let CartValidation { cart, skipped } = self
            .gateway
            .validate_cart(tenant, identity)
            .await
            .map_err(OrdersServiceError::CartValidationFailed)?;

        if !skipped.is_empty() {
            warn!(cart = %cart.uuid, skipped = skipped.len(), "checking out with unrefreshed prices");
        }

        if cart.items.is_empty() {
            return Err(OrdersServiceError::CartEmpty);
        }

        let totals = OrderTotals::from_lines(&cart.items, &self.fallback_currency);
        let day = Timestamp::now().to_zoned(TimeZone::UTC).date();

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let sequence = self
            .orders_repository
            .next_order_sequence(&mut tx, day)
            .await?;

        let row = self
            .orders_repository
            .create_order(
                &mut tx,
                NewOrderRow {
                    user_uuid: user,
                    cart_uuid: cart.uuid,
                    order_number: OrderNumber::new(day, sequence),
                    status: OrderStatus::INITIAL,
                    totals,
                    details,
                },
            )
            .await?;

        for item in &cart.items {
            self.items_repository
                .create_order_item(&mut tx, row.uuid, item)
                .await?;
        }

        self.logs_repository
            .create_order_status_log(
                &mut tx,
                row.uuid,
                StatusChange::creation(OrderStatus::INITIAL),
                Some(user.into_uuid()),
                None,
            )
            .await?;

        let order = load_order(&mut tx, row).await?;

        tx.commit().await?;

        debug!(order = %order.uuid, order_number = %order.order_number, "order created");

        if let Err(error) = self
            .gateway
            .complete_cart(tenant, identity, cart.uuid)
            .await
        {
            warn!(cart = %cart.uuid, order = %order.uuid, %error, "failed to mark cart completed");
        }

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Place an order from the caller's active cart.
    async fn checkout(
        &self,
        tenant: TenantUuid,
        identity: Identity,
        details: CheckoutDetails,
    ) -> Result<Order, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use sqlx::PgPool;
    use testresult::TestResult;
    use trolley::{carts::CartStatus, products::ProductType};
    use uuid::Uuid;

    use crate::{
        domain::{
            carts::{
                CartsService,
                models::{Cart, CartItem, CartItemUuid, CartUuid, NewCartItem},
            },
            orders::{OrdersService, gateways::MockCartGateway, models::OrderFilter},
        },
        identity::{SessionUuid, UserUuid},
        test::{
            TestContext,
            helpers::{chf, local_gateway, price_list},
        },
    };

    use super::*;

    fn cart_with(lines: &[(Decimal, u32)]) -> Cart {
        let cart_uuid = CartUuid::new();
        let now = Timestamp::now();

        let items = lines
            .iter()
            .map(|(unit_price, quantity)| CartItem {
                uuid: CartItemUuid::new(),
                cart_uuid,
                product_uuid: Uuid::now_v7(),
                variant_uuid: None,
                product_type: ProductType::Simple,
                name: "Item".to_string(),
                sku: None,
                image_url: None,
                quantity: *quantity,
                unit_price: *unit_price,
                currency: chf(),
                configuration: None,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Cart {
            uuid: cart_uuid,
            user_uuid: None,
            session_uuid: None,
            status: CartStatus::Active,
            subtotal: Decimal::ZERO,
            currency: chf(),
            items,
            created_at: now,
            updated_at: now,
        }
    }

    /// A checkout service whose database must never be reached.
    fn offline_checkout(gateway: MockCartGateway) -> TestResult<PgCheckoutService> {
        let pool = PgPool::connect_lazy("postgres://unused@127.0.0.1:9/unused")?;

        Ok(PgCheckoutService::new(
            Db::new(pool),
            Arc::new(gateway),
            Currency::default_fallback(),
        ))
    }

    #[tokio::test]
    async fn checkout_requires_a_user() -> TestResult {
        let checkout = offline_checkout(MockCartGateway::new())?;

        let result = checkout
            .checkout(
                TenantUuid::new(),
                Identity::guest(SessionUuid::new()),
                CheckoutDetails::default(),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::MissingUser)),
            "expected MissingUser, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_before_validation_or_numbering() -> TestResult {
        let mut gateway = MockCartGateway::new();

        gateway
            .expect_fetch_cart()
            .times(1)
            .returning(|_, _| Ok(cart_with(&[])));
        gateway.expect_validate_cart().never();
        gateway.expect_complete_cart().never();

        let checkout = offline_checkout(gateway)?;

        let result = checkout
            .checkout(
                TenantUuid::new(),
                Identity::user(UserUuid::new()),
                CheckoutDetails::default(),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::CartEmpty)),
            "expected CartEmpty, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn missing_cart_is_reported() -> TestResult {
        let mut gateway = MockCartGateway::new();

        gateway
            .expect_fetch_cart()
            .returning(|_, _| Err(CartGatewayError::NotFound));

        let result = offline_checkout(gateway)?
            .checkout(
                TenantUuid::new(),
                Identity::user(UserUuid::new()),
                CheckoutDetails::default(),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn validation_failure_aborts_checkout() -> TestResult {
        let mut gateway = MockCartGateway::new();

        gateway
            .expect_fetch_cart()
            .returning(|_, _| Ok(cart_with(&[(Decimal::TEN, 1)])));
        gateway
            .expect_validate_cart()
            .returning(|_, _| Err(CartGatewayError::Rejected("503: down".to_string())));
        gateway.expect_complete_cart().never();

        let result = offline_checkout(gateway)?
            .checkout(
                TenantUuid::new(),
                Identity::user(UserUuid::new()),
                CheckoutDetails::default(),
            )
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::CartValidationFailed(
                    CartGatewayError::Rejected(_)
                ))
            ),
            "expected CartValidationFailed, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn checkout_freezes_cart_into_confirmed_order() -> TestResult {
        let ctx = TestContext::new().await;
        let desk = Uuid::now_v7();
        let lamp = Uuid::now_v7();
        let user = UserUuid::new();
        let identity = Identity::user(user);

        let carts = ctx.carts(price_list(&[
            (desk, Decimal::new(1000, 2)),
            (lamp, Decimal::new(500, 2)),
        ]));

        for (product_uuid, quantity) in [(desk, 2), (lamp, 1)] {
            carts
                .add_item(
                    ctx.tenant_uuid,
                    identity,
                    NewCartItem {
                        product_uuid,
                        variant_uuid: None,
                        quantity,
                        configuration: None,
                    },
                )
                .await?;
        }

        let checkout = ctx.checkout(local_gateway(carts.clone()));

        let order = checkout
            .checkout(
                ctx.tenant_uuid,
                identity,
                CheckoutDetails {
                    shipping_address: Some(json!({ "city": "Zurich" })),
                    billing_address: None,
                    notes: Some("Leave at the door".to_string()),
                },
            )
            .await?;

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.user_uuid, user);
        assert_eq!(order.subtotal, Decimal::new(2500, 2));
        assert_eq!(order.tax, Decimal::ZERO);
        assert_eq!(order.total, Decimal::new(2500, 2));
        assert_eq!(order.currency, chf());
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.shipping_address, Some(json!({ "city": "Zurich" })));
        assert_eq!(order.notes.as_deref(), Some("Leave at the door"));

        let desk_line = order.items.first().ok_or("order has items")?;

        assert_eq!(desk_line.product_uuid, desk);
        assert_eq!(desk_line.total_price, Decimal::new(2000, 2));

        assert_eq!(order.history.len(), 1);

        let created = order.history.first().ok_or("creation is logged")?;

        assert_eq!(created.from_status, None);
        assert_eq!(created.to_status, OrderStatus::Confirmed);

        let cart_uuid = order.cart_uuid.ok_or("order references its cart")?;
        let cart = carts.get_cart(ctx.tenant_uuid, cart_uuid).await?;

        assert_eq!(cart.status, CartStatus::Completed);

        Ok(())
    }

    #[tokio::test]
    async fn order_numbers_count_per_tenant_per_day() -> TestResult {
        let ctx = TestContext::new().await;
        let product = Uuid::now_v7();
        let carts = ctx.carts(price_list(&[(product, Decimal::ONE)]));
        let checkout = ctx.checkout(local_gateway(carts.clone()));
        let tenant_b = ctx.create_tenant("Tenant B").await;

        let mut numbers = Vec::new();

        for tenant in [ctx.tenant_uuid, ctx.tenant_uuid, tenant_b] {
            let identity = Identity::user(UserUuid::new());

            carts
                .add_item(
                    tenant,
                    identity,
                    NewCartItem {
                        product_uuid: product,
                        variant_uuid: None,
                        quantity: 1,
                        configuration: None,
                    },
                )
                .await?;

            let order = checkout
                .checkout(tenant, identity, CheckoutDetails::default())
                .await?;

            numbers.push(order.order_number.to_string());
        }

        let today = Timestamp::now().to_zoned(TimeZone::UTC).date();
        let prefix = format!("ORD-{}-", today.strftime("%Y%m%d"));

        assert_eq!(
            numbers,
            vec![
                format!("{prefix}0001"),
                format!("{prefix}0002"),
                format!("{prefix}0001"),
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_cart_completion_does_not_fail_checkout() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let mut gateway = MockCartGateway::new();

        gateway
            .expect_fetch_cart()
            .returning(|_, _| Ok(cart_with(&[(Decimal::TEN, 1)])));
        gateway.expect_validate_cart().returning(|_, _| {
            Ok(CartValidation {
                cart: cart_with(&[(Decimal::TEN, 3)]),
                skipped: Vec::new(),
            })
        });
        gateway
            .expect_complete_cart()
            .times(1)
            .returning(|_, _, _| Err(CartGatewayError::Rejected("500: boom".to_string())));

        let order = ctx
            .checkout(Arc::new(gateway))
            .checkout(ctx.tenant_uuid, Identity::user(user), CheckoutDetails::default())
            .await?;

        assert_eq!(order.total, Decimal::from(30), "validated prices are used");

        let page = ctx
            .orders()
            .list_orders(ctx.tenant_uuid, user, OrderFilter::default())
            .await?;

        assert_eq!(page.total, 1, "the order is kept");

        Ok(())
    }

    #[tokio::test]
    async fn cart_can_only_become_one_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cart = cart_with(&[(Decimal::TEN, 1)]);
        let mut gateway = MockCartGateway::new();

        let fetched = cart.clone();
        gateway
            .expect_fetch_cart()
            .times(2)
            .returning(move |_, _| Ok(fetched.clone()));
        gateway.expect_validate_cart().times(2).returning(move |_, _| {
            Ok(CartValidation {
                cart: cart.clone(),
                skipped: Vec::new(),
            })
        });
        gateway
            .expect_complete_cart()
            .times(1)
            .returning(|_, _, _| Err(CartGatewayError::Rejected("500: boom".to_string())));

        let checkout = ctx.checkout(Arc::new(gateway));

        checkout
            .checkout(ctx.tenant_uuid, Identity::user(user), CheckoutDetails::default())
            .await?;

        let retried = checkout
            .checkout(ctx.tenant_uuid, Identity::user(user), CheckoutDetails::default())
            .await;

        assert!(
            matches!(retried, Err(OrdersServiceError::CartAlreadyOrdered)),
            "expected CartAlreadyOrdered, got {retried:?}"
        );

        let page = ctx
            .orders()
            .list_orders(ctx.tenant_uuid, user, OrderFilter::default())
            .await?;

        assert_eq!(page.total, 1, "only the first checkout is stored");

        Ok(())
    }
}
