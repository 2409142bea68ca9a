//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};
use trolley::{configuration::Configuration, pricing::PricedLine};

use crate::{
    database::{try_get_parsed, try_get_quantity, try_get_timestamp},
    domain::{
        carts::models::CartItem,
        orders::models::{OrderItem, OrderItemUuid, OrderUuid},
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Freezes a cart item onto an order.
    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: &CartItem,
    ) -> Result<OrderItem, sqlx::Error> {
        let quantity =
            i32::try_from(item.quantity).map_err(|error| sqlx::Error::Encode(Box::new(error)))?;

        query_as::<Postgres, OrderItem>(CREATE_ORDER_ITEM_SQL)
            .bind(OrderItemUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(item.product_uuid)
            .bind(item.variant_uuid)
            .bind(item.product_type.as_str())
            .bind(item.name.as_str())
            .bind(item.sku.as_deref())
            .bind(item.image_url.as_deref())
            .bind(quantity)
            .bind(item.unit_price)
            .bind(item.total_price())
            .bind(item.currency.as_str())
            .bind(item.configuration.clone().map(Json))
            .fetch_one(&mut **tx)
            .await
    }

    /// Items of an order in checkout order.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: row.try_get("product_uuid")?,
            variant_uuid: row.try_get("variant_uuid")?,
            product_type: try_get_parsed(row, "product_type")?,
            name: row.try_get("name")?,
            sku: row.try_get("sku")?,
            image_url: row.try_get("image_url")?,
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: row.try_get("unit_price")?,
            total_price: row.try_get("total_price")?,
            currency: try_get_parsed(row, "currency")?,
            configuration: row
                .try_get::<Option<Json<Configuration>>, _>("configuration")?
                .map(|Json(configuration)| configuration),
            created_at: try_get_timestamp(row, "created_at")?,
        })
    }
}
