//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            models::{
                CANCELLED_BY_CUSTOMER, Order, OrderFilter, OrderPage, OrderUuid, StatusTransition,
            },
            repositories::{PgOrderStatusLogsRepository, PgOrdersRepository, load_order},
        },
        tenants::models::TenantUuid,
    },
    identity::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    logs_repository: PgOrderStatusLogsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            logs_repository: PgOrderStatusLogsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        filter: OrderFilter,
    ) -> Result<OrderPage, OrdersServiceError> {
        let filter = filter.clamped();

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let orders = self
            .orders_repository
            .list_orders(&mut tx, user, &filter)
            .await?;

        let total = self
            .orders_repository
            .count_orders(&mut tx, user, filter.status)
            .await?;

        tx.commit().await?;

        Ok(OrderPage {
            orders,
            total,
            page: filter.page,
            per_page: filter.per_page,
        })
    }

    async fn get_order(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let row = self.orders_repository.get_order(&mut tx, order).await?;

        if row.user_uuid != user {
            return Err(OrdersServiceError::Forbidden);
        }

        let order = load_order(&mut tx, row).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[tracing::instrument(name = "orders.cancel_order", skip(self))]
    async fn cancel_order(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let row = self.orders_repository.lock_order(&mut tx, order).await?;

        if row.user_uuid != user {
            return Err(OrdersServiceError::Forbidden);
        }

        let change = row.status.cancel()?;

        let row = self
            .orders_repository
            .set_order_status(&mut tx, order, change.to)
            .await?;

        self.logs_repository
            .create_order_status_log(
                &mut tx,
                order,
                change,
                Some(user.into_uuid()),
                Some(CANCELLED_BY_CUSTOMER),
            )
            .await?;

        let order = load_order(&mut tx, row).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.transition_order",
        skip(self, transition),
        fields(to = %transition.to)
    )]
    async fn transition_order(
        &self,
        tenant: TenantUuid,
        order: OrderUuid,
        transition: StatusTransition,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let row = self.orders_repository.lock_order(&mut tx, order).await?;
        let change = row.status.transition(transition.to)?;

        let row = self
            .orders_repository
            .set_order_status(&mut tx, order, change.to)
            .await?;

        self.logs_repository
            .create_order_status_log(
                &mut tx,
                order,
                change,
                transition.actor,
                transition.note.as_deref(),
            )
            .await?;

        debug!(order_number = %row.order_number, from = ?change.from, "order status changed");

        let order = load_order(&mut tx, row).await?;

        tx.commit().await?;

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// List a user's orders, newest first.
    async fn list_orders(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        filter: OrderFilter,
    ) -> Result<OrderPage, OrdersServiceError>;

    /// Retrieve one of the user's orders with its items and history.
    async fn get_order(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Cancel one of the user's orders while it is still pending or confirmed.
    async fn cancel_order(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Move an order along the status lifecycle on behalf of staff or fulfilment.
    async fn transition_order(
        &self,
        tenant: TenantUuid,
        order: OrderUuid,
        transition: StatusTransition,
    ) -> Result<Order, OrdersServiceError>;
}
