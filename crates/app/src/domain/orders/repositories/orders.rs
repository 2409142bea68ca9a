//! Orders Repository

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar, types::Json,
};
use trolley::{
    currency::Currency,
    orders::{OrderNumber, OrderStatus, OrderTotals},
};

use crate::{
    database::{decode_error, try_get_parsed, try_get_timestamp},
    domain::{
        carts::models::CartUuid,
        orders::models::{
            CheckoutDetails, Order, OrderFilter, OrderItem, OrderStatusLog, OrderSummary,
            OrderUuid,
        },
    },
    identity::UserUuid,
};

const NEXT_ORDER_SEQUENCE_SQL: &str = include_str!("../sql/next_order_sequence.sql");
const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const SET_ORDER_STATUS_SQL: &str = include_str!("../sql/set_order_status.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("../sql/count_orders.sql");

/// An `orders` row, before items and history are attached.
#[derive(Debug, Clone)]
pub(crate) struct OrderRow {
    pub(crate) uuid: OrderUuid,
    pub(crate) user_uuid: UserUuid,
    pub(crate) cart_uuid: Option<CartUuid>,
    pub(crate) order_number: OrderNumber,
    pub(crate) status: OrderStatus,
    pub(crate) subtotal: Decimal,
    pub(crate) tax: Decimal,
    pub(crate) total: Decimal,
    pub(crate) currency: Currency,
    pub(crate) shipping_address: Option<Value>,
    pub(crate) billing_address: Option<Value>,
    pub(crate) notes: Option<String>,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
}

impl OrderRow {
    pub(crate) fn into_order(self, items: Vec<OrderItem>, history: Vec<OrderStatusLog>) -> Order {
        Order {
            uuid: self.uuid,
            user_uuid: self.user_uuid,
            cart_uuid: self.cart_uuid,
            order_number: self.order_number,
            status: self.status,
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            currency: self.currency,
            shipping_address: self.shipping_address,
            billing_address: self.billing_address,
            notes: self.notes,
            items,
            history,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// An order header ready to insert.
#[derive(Debug, Clone)]
pub(crate) struct NewOrderRow {
    pub(crate) user_uuid: UserUuid,
    pub(crate) cart_uuid: CartUuid,
    pub(crate) order_number: OrderNumber,
    pub(crate) status: OrderStatus,
    pub(crate) totals: OrderTotals,
    pub(crate) details: CheckoutDetails,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Claims the next order sequence of the current tenant on `day`, starting at 1.
    ///
    /// The counter row stays locked until the transaction ends, so concurrent checkouts of one
    /// tenant take numbers one at a time.
    pub(crate) async fn next_order_sequence(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        day: Date,
    ) -> Result<u32, sqlx::Error> {
        let sequence: i32 = query_scalar(NEXT_ORDER_SEQUENCE_SQL)
            .bind(day.to_string())
            .fetch_one(&mut **tx)
            .await?;

        u32::try_from(sequence).map_err(|error| decode_error("last_value", error))
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrderRow,
    ) -> Result<OrderRow, sqlx::Error> {
        let NewOrderRow {
            user_uuid,
            cart_uuid,
            order_number,
            status,
            totals,
            details,
        } = order;

        query_as::<Postgres, OrderRow>(CREATE_ORDER_SQL)
            .bind(OrderUuid::new().into_uuid())
            .bind(user_uuid.into_uuid())
            .bind(cart_uuid.into_uuid())
            .bind(String::from(order_number))
            .bind(status.as_str())
            .bind(totals.subtotal)
            .bind(totals.tax)
            .bind(totals.total)
            .bind(totals.currency.as_str().to_string())
            .bind(details.shipping_address.map(Json))
            .bind(details.billing_address.map(Json))
            .bind(details.notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRow, sqlx::Error> {
        query_as::<Postgres, OrderRow>(SET_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// One page of a user's orders, newest first.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderSummary>, sqlx::Error> {
        query_as::<Postgres, OrderSummary>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(filter.limit())
            .bind(filter.offset())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        status: Option<OrderStatus>,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(status.map(OrderStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|error| decode_error("count", error))
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            cart_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("cart_uuid")?
                .map(CartUuid::from_uuid),
            order_number: OrderNumber::from_stored(row.try_get("order_number")?),
            status: try_get_parsed(row, "status")?,
            subtotal: row.try_get("subtotal")?,
            tax: row.try_get("tax")?,
            total: row.try_get("total")?,
            currency: try_get_parsed(row, "currency")?,
            shipping_address: row
                .try_get::<Option<Json<Value>>, _>("shipping_address")?
                .map(|Json(address)| address),
            billing_address: row
                .try_get::<Option<Json<Value>>, _>("billing_address")?
                .map(|Json(address)| address),
            notes: row.try_get("notes")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderSummary {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let item_count: i64 = row.try_get("item_count")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: OrderNumber::from_stored(row.try_get("order_number")?),
            status: try_get_parsed(row, "status")?,
            total: row.try_get("total")?,
            currency: try_get_parsed(row, "currency")?,
            item_count: u32::try_from(item_count)
                .map_err(|error| decode_error("item_count", error))?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
