//! Cart Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use trolley::{
    carts::{CartLine, CartStatus},
    configuration::Configuration,
    currency::Currency,
    pricing::PricedLine,
    products::ProductType,
};
use uuid::Uuid;

use crate::{
    catalog::PriceQuery,
    identity::{Identity, SessionUuid, UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// Cart Model
///
/// `subtotal` and `currency` are derived from `items` whenever the cart is loaded.
#[derive(Debug, Clone)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: Option<UserUuid>,
    pub session_uuid: Option<SessionUuid>,
    pub status: CartStatus,
    pub subtotal: Decimal,
    pub currency: Currency,
    pub items: Vec<CartItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Cart {
    /// Whether the cart belongs to the user or the guest session of `identity`.
    #[must_use]
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        let by_user = identity.user.is_some() && self.user_uuid == identity.user;
        let by_session = identity.session.is_some() && self.session_uuid == identity.session;

        by_user || by_session
    }
}

/// CartItem Model
#[derive(Debug, Clone)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: Uuid,
    pub variant_uuid: Option<Uuid>,
    pub product_type: ProductType,
    pub name: String,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub currency: Currency,
    pub configuration: Option<Configuration>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItem {
    /// Price query re-resolving this item at its current quantity.
    #[must_use]
    pub fn price_query(&self) -> PriceQuery {
        PriceQuery {
            product_uuid: self.product_uuid,
            variant_uuid: self.variant_uuid,
            quantity: self.quantity,
            configuration: self.configuration.clone(),
        }
    }
}

impl PricedLine for CartItem {
    fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn currency(&self) -> &Currency {
        &self.currency
    }
}

impl CartLine for CartItem {
    fn cart_uuid(&self) -> Uuid {
        self.cart_uuid.into_uuid()
    }

    fn product_uuid(&self) -> Uuid {
        self.product_uuid
    }

    fn variant_uuid(&self) -> Option<Uuid> {
        self.variant_uuid
    }

    fn configuration(&self) -> Option<&Configuration> {
        self.configuration.as_ref()
    }
}

/// New CartItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_uuid: Uuid,
    pub variant_uuid: Option<Uuid>,
    pub quantity: u32,
    pub configuration: Option<Configuration>,
}

/// Result of re-pricing every item of a cart.
#[derive(Debug, Clone)]
pub struct CartValidation {
    /// The cart after refresh.
    pub cart: Cart,

    /// Items the catalog could not price; they were left unchanged.
    pub skipped: Vec<SkippedItem>,
}

/// A cart item left untouched by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub item_uuid: CartItemUuid,
    pub product_uuid: Uuid,
    pub reason: String,
}
