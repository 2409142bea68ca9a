//! Test helpers.

use std::{str::FromStr, sync::Arc};

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use trolley::{
    carts::CartStatus,
    currency::Currency,
    orders::{OrderNumber, OrderStatus},
    products::ProductType,
};
use trolley_app::{
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartItem, CartItemUuid, CartUuid},
        },
        orders::{
            MockCheckoutService, MockOrdersService,
            models::{Order, OrderItem, OrderItemUuid, OrderStatusLog, OrderStatusLogUuid, OrderUuid},
        },
        tenants::{
            MockTenantsService,
            models::{Tenant, TenantUuid},
        },
    },
    identity::{Identity, SessionUuid, UserUuid},
};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_TENANT_UUID: TenantUuid = TenantUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(1));
pub(crate) const TEST_SESSION_UUID: SessionUuid = SessionUuid::from_uuid(Uuid::from_u128(2));

/// Services a handler test expects to be called. Unset services reject every call.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) tenants: Option<MockTenantsService>,
    pub(crate) carts: Option<MockCartsService>,
    pub(crate) orders: Option<MockOrdersService>,
    pub(crate) checkout: Option<MockCheckoutService>,
}

impl Mocks {
    pub(crate) fn carts(carts: MockCartsService) -> Self {
        Self {
            carts: Some(carts),
            ..Self::default()
        }
    }

    pub(crate) fn orders(orders: MockOrdersService) -> Self {
        Self {
            orders: Some(orders),
            ..Self::default()
        }
    }

    pub(crate) fn checkout(checkout: MockCheckoutService) -> Self {
        Self {
            checkout: Some(checkout),
            ..Self::default()
        }
    }

    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            tenants: Arc::new(self.tenants.unwrap_or_default()),
            carts: Arc::new(self.carts.unwrap_or_default()),
            orders: Arc::new(self.orders.unwrap_or_default()),
            checkout: Arc::new(self.checkout.unwrap_or_default()),
        })
    }
}

pub(crate) fn state_with_tenants(tenants: MockTenantsService) -> Arc<State> {
    Mocks {
        tenants: Some(tenants),
        ..Mocks::default()
    }
    .into_state()
}

/// Stores the test tenant and a fixed identity, standing in for the identity middleware.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InjectIdentity(pub(crate) Identity);

#[salvo::handler]
impl InjectIdentity {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_tenant_uuid(TEST_TENANT_UUID);
        depot.insert_identity(self.0);

        ctrl.call_next(req, depot, res).await;
    }
}

pub(crate) fn user_identity() -> Identity {
    Identity::user(TEST_USER_UUID)
}

pub(crate) fn guest_identity() -> Identity {
    Identity::guest(TEST_SESSION_UUID)
}

pub(crate) fn make_service(mocks: Mocks, identity: Identity, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(InjectIdentity(identity))
            .push(route),
    )
}

pub(crate) fn chf() -> Currency {
    Currency::default_fallback()
}

pub(crate) fn make_tenant(uuid: TenantUuid) -> Tenant {
    Tenant {
        uuid,
        name: "Test Tenant".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(identity: Identity, lines: &[(&str, u32)]) -> Cart {
    let uuid = CartUuid::from_uuid(Uuid::from_u128(10));

    let items: Vec<CartItem> = lines
        .iter()
        .map(|(unit_price, quantity)| CartItem {
            uuid: CartItemUuid::new(),
            cart_uuid: uuid,
            product_uuid: Uuid::now_v7(),
            variant_uuid: None,
            product_type: ProductType::Simple,
            name: "Widget".to_string(),
            sku: Some("WID-1".to_string()),
            image_url: None,
            quantity: *quantity,
            unit_price: Decimal::from_str(unit_price).unwrap_or_default(),
            currency: chf(),
            configuration: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        })
        .collect();

    let subtotal = items
        .iter()
        .map(|item| item.unit_price * Decimal::from(item.quantity))
        .sum();

    Cart {
        uuid,
        user_uuid: identity.user,
        session_uuid: identity.session,
        status: CartStatus::Active,
        subtotal,
        currency: chf(),
        items,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> Order {
    let unit_price = Decimal::new(1250, 2);
    let total = unit_price * Decimal::from(2);

    Order {
        uuid,
        user_uuid: TEST_USER_UUID,
        cart_uuid: Some(CartUuid::new()),
        order_number: OrderNumber::from_stored("ORD-20261018-0001".to_string()),
        status,
        subtotal: total,
        tax: Decimal::ZERO,
        total,
        currency: chf(),
        shipping_address: None,
        billing_address: None,
        notes: None,
        items: vec![OrderItem {
            uuid: OrderItemUuid::new(),
            order_uuid: uuid,
            product_uuid: Uuid::now_v7(),
            variant_uuid: None,
            product_type: ProductType::Simple,
            name: "Widget".to_string(),
            sku: None,
            image_url: None,
            quantity: 2,
            unit_price,
            total_price: total,
            currency: chf(),
            configuration: None,
            created_at: Timestamp::UNIX_EPOCH,
        }],
        history: vec![OrderStatusLog {
            uuid: OrderStatusLogUuid::new(),
            order_uuid: uuid,
            from_status: None,
            to_status: OrderStatus::INITIAL,
            actor_uuid: Some(TEST_USER_UUID.into_uuid()),
            note: None,
            created_at: Timestamp::UNIX_EPOCH,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
