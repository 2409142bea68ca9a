//! Cart response payloads.
//!
//! Field names follow the wire format remote checkout services read, so a `trolley-json`
//! instance can serve as the cart service for another instance's checkout.

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trolley::{configuration::Configuration, currency::Currency, pricing::PricedLine};
use uuid::Uuid;

use trolley_app::domain::carts::models::{Cart, CartItem, CartValidation, SkippedItem};

/// Pads an amount to at least the minor-unit digits of its currency.
///
/// Sub-unit digits are kept, so a served line always satisfies `total_price == unit_price *
/// quantity` and a remote checkout freezes the same amounts as a local one.
pub(crate) fn money(amount: Decimal, currency: &Currency) -> Decimal {
    let mut amount = amount.normalize();

    if amount.scale() < currency.exponent() {
        amount.rescale(currency.exponent());
    }

    amount
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub id: Uuid,

    /// The owning user, once logged in
    pub user_id: Option<Uuid>,

    /// The guest session the cart was started in
    pub session_id: Option<Uuid>,

    /// Lifecycle status: `active`, `merged` or `completed`
    pub status: String,

    /// Sum of the line totals
    #[salvo(schema(value_type = String))]
    pub subtotal: Decimal,

    /// ISO 4217 currency code
    pub currency: String,

    /// The items in the cart, in insertion order
    pub items: Vec<CartItemResponse>,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.uuid.into_uuid(),
            user_id: cart.user_uuid.map(Into::into),
            session_id: cart.session_uuid.map(Into::into),
            status: cart.status.as_str().to_string(),
            subtotal: money(cart.subtotal, &cart.currency),
            currency: cart.currency.to_string(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub id: Uuid,

    /// The cart holding the item
    pub cart_id: Uuid,

    /// The catalog product
    pub product_id: Uuid,

    /// The catalog variant, if any
    pub variant_id: Option<Uuid>,

    /// Product type captured when the item was priced
    pub product_type: String,

    /// Display name
    pub name: String,

    /// Stock keeping unit
    pub sku: Option<String>,

    /// Product image
    pub image_url: Option<String>,

    /// Number of units
    pub quantity: u32,

    /// Price of one unit
    #[salvo(schema(value_type = String))]
    pub unit_price: Decimal,

    /// Unit price times quantity
    #[salvo(schema(value_type = String))]
    pub total_price: Decimal,

    /// ISO 4217 currency code
    pub currency: String,

    /// Normalized bundle or parametric configuration
    #[salvo(schema(value_type = Option<Object>))]
    pub configuration: Option<Configuration>,

    /// The date and time the item was added
    pub created_at: String,

    /// The date and time the item was last updated
    pub updated_at: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        let total_price = money(item.total_price(), &item.currency);
        let unit_price = money(item.unit_price, &item.currency);

        Self {
            id: item.uuid.into_uuid(),
            cart_id: item.cart_uuid.into_uuid(),
            product_id: item.product_uuid,
            variant_id: item.variant_uuid,
            product_type: item.product_type.as_str().to_string(),
            name: item.name,
            sku: item.sku,
            image_url: item.image_url,
            quantity: item.quantity,
            unit_price,
            total_price,
            currency: item.currency.to_string(),
            configuration: item.configuration,
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// Cart Validation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartValidationResponse {
    /// The cart with refreshed prices
    pub cart: CartResponse,

    /// Items that could not be re-priced and kept their previous price
    pub skipped: Vec<SkippedItemResponse>,
}

impl From<CartValidation> for CartValidationResponse {
    fn from(validation: CartValidation) -> Self {
        Self {
            cart: validation.cart.into(),
            skipped: validation
                .skipped
                .into_iter()
                .map(SkippedItemResponse::from)
                .collect(),
        }
    }
}

/// Skipped Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SkippedItemResponse {
    pub item_id: Uuid,
    pub product_id: Uuid,

    /// Why the item could not be priced
    pub reason: String,
}

impl From<SkippedItem> for SkippedItemResponse {
    fn from(skipped: SkippedItem) -> Self {
        Self {
            item_id: skipped.item_uuid.into_uuid(),
            product_id: skipped.product_uuid,
            reason: skipped.reason,
        }
    }
}

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// The catalog product
    #[serde(alias = "productId")]
    pub product_id: Uuid,

    /// The catalog variant, if any
    #[serde(default, alias = "variantId")]
    pub variant_id: Option<Uuid>,

    /// Number of units; defaults to one
    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Raw bundle or parametric configuration, normalized before pricing
    #[serde(default)]
    #[salvo(schema(value_type = Option<Object>))]
    pub configuration: Option<Value>,
}

fn default_quantity() -> i64 {
    1
}

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New number of units
    pub quantity: i64,
}

/// Complete Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CompleteCartRequest {
    /// The cart to complete
    #[serde(alias = "cartId")]
    pub cart_id: Uuid,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use crate::test_helpers::{make_cart, user_identity};

    use super::*;

    #[test]
    fn money_pads_to_the_currency_minor_unit() -> Result<(), rust_decimal::Error> {
        let chf = Currency::default_fallback();

        assert_eq!(money(Decimal::from(25), &chf).to_string(), "25.00");
        assert_eq!(money(Decimal::from_str("12.5000")?, &chf).to_string(), "12.50");

        Ok(())
    }

    #[test]
    fn money_keeps_sub_unit_digits() -> Result<(), rust_decimal::Error> {
        let chf = Currency::default_fallback();

        assert_eq!(money(Decimal::from_str("12.345")?, &chf).to_string(), "12.345");
        assert_eq!(money(Decimal::from_str("3.3333")?, &chf).to_string(), "3.3333");

        Ok(())
    }

    #[test]
    fn four_decimal_unit_price_line_total_matches_unit_times_quantity() -> TestResult {
        let cart = make_cart(user_identity(), &[("3.3333", 3)]);
        let item = CartItemResponse::from(cart.items.into_iter().next().ok_or("one item")?);

        assert_eq!(item.unit_price, Decimal::from_str("3.3333")?);
        assert_eq!(item.total_price, Decimal::from_str("9.9999")?);
        assert_eq!(
            item.total_price,
            item.unit_price * Decimal::from(item.quantity),
            "line total must equal unit price times quantity"
        );

        Ok(())
    }

    #[test]
    fn add_item_request_accepts_camel_case_and_defaults_quantity() -> serde_json::Result<()> {
        let product = Uuid::now_v7();
        let request: AddCartItemRequest =
            serde_json::from_value(serde_json::json!({ "productId": product }))?;

        assert_eq!(request.product_id, product);
        assert_eq!(request.quantity, 1);
        assert!(request.configuration.is_none(), "no configuration given");

        Ok(())
    }
}
