//! Cart Items Repository

use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};
use trolley::{configuration::Configuration, currency::Currency, products::ProductType};
use uuid::Uuid;

use crate::{
    catalog::ResolvedPrice,
    database::{try_get_parsed, try_get_quantity, try_get_timestamp},
    domain::carts::models::{CartItem, CartItemUuid, CartUuid},
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const CREATE_CART_ITEM_SQL: &str = include_str!("../sql/create_cart_item.sql");
const UPDATE_CART_ITEM_QUANTITY_SQL: &str = include_str!("../sql/update_cart_item_quantity.sql");
const REFRESH_CART_ITEM_SQL: &str = include_str!("../sql/refresh_cart_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const CLEAR_CART_ITEMS_SQL: &str = include_str!("../sql/clear_cart_items.sql");
const MOVE_CART_ITEMS_SQL: &str = include_str!("../sql/move_cart_items.sql");

/// A priced line ready to insert.
#[derive(Debug, Clone)]
pub(crate) struct NewCartItemRow {
    pub(crate) product_uuid: Uuid,
    pub(crate) variant_uuid: Option<Uuid>,
    pub(crate) quantity: i32,
    pub(crate) configuration: Option<Configuration>,
    pub(crate) price: ResolvedPrice,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Items of a cart in insertion order.
    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(GET_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: NewCartItemRow,
    ) -> Result<CartItem, sqlx::Error> {
        let NewCartItemRow {
            product_uuid,
            variant_uuid,
            quantity,
            configuration,
            price,
        } = item;

        query_as::<Postgres, CartItem>(CREATE_CART_ITEM_SQL)
            .bind(CartItemUuid::new().into_uuid())
            .bind(cart.into_uuid())
            .bind(product_uuid)
            .bind(variant_uuid)
            .bind(price.product_type.as_str())
            .bind(price.details.name)
            .bind(price.details.sku)
            .bind(price.details.image_url)
            .bind(quantity)
            .bind(price.unit_price)
            .bind(price.currency.as_str().to_string())
            .bind(configuration.map(Json))
            .fetch_one(&mut **tx)
            .await
    }

    /// Sets the quantity of an item, if it belongs to `cart`.
    pub(crate) async fn update_cart_item_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
        quantity: i32,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(UPDATE_CART_ITEM_QUANTITY_SQL)
            .bind(item.into_uuid())
            .bind(cart.into_uuid())
            .bind(quantity)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Overwrites price and display fields with freshly resolved values.
    pub(crate) async fn refresh_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: CartItemUuid,
        price: ResolvedPrice,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(REFRESH_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(price.product_type.as_str())
            .bind(price.details.name)
            .bind(price.details.sku)
            .bind(price.details.image_url)
            .bind(price.unit_price)
            .bind(price.currency.as_str().to_string())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Reassigns every item of `from` to `to`.
    pub(crate) async fn move_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        from: CartUuid,
        to: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MOVE_CART_ITEMS_SQL)
            .bind(from.into_uuid())
            .bind(to.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let unit_price: Decimal = row.try_get("unit_price")?;
        let product_type: ProductType = try_get_parsed(row, "product_type")?;
        let currency: Currency = try_get_parsed(row, "currency")?;

        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            product_uuid: row.try_get("product_uuid")?,
            variant_uuid: row.try_get("variant_uuid")?,
            product_type,
            name: row.try_get("name")?,
            sku: row.try_get("sku")?,
            image_url: row.try_get("image_url")?,
            quantity: try_get_quantity(row, "quantity")?,
            unit_price,
            currency,
            configuration: row
                .try_get::<Option<Json<Configuration>>, _>("configuration")?
                .map(|Json(configuration)| configuration),
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
