//! Order Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde_json::Value;
use trolley::{
    configuration::Configuration,
    currency::Currency,
    orders::{OrderNumber, OrderStatus},
    pricing::PricedLine,
    products::ProductType,
};
use uuid::Uuid;

use crate::{domain::carts::models::CartUuid, identity::UserUuid, uuids::TypedUuid};

/// Note recorded when a customer cancels their own order.
pub const CANCELLED_BY_CUSTOMER: &str = "Cancelled by customer";

/// Default number of orders per page.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest accepted page size.
pub const MAX_PER_PAGE: u32 = 100;

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Order Status Log UUID
pub type OrderStatusLogUuid = TypedUuid<OrderStatusLog>;

/// Order Model
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub cart_uuid: Option<CartUuid>,
    pub order_number: OrderNumber,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: Currency,
    pub shipping_address: Option<Value>,
    pub billing_address: Option<Value>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub history: Vec<OrderStatusLog>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Immutable snapshot of a cart item taken at checkout.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: Uuid,
    pub variant_uuid: Option<Uuid>,
    pub product_type: ProductType,
    pub name: String,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub currency: Currency,
    pub configuration: Option<Configuration>,
    pub created_at: Timestamp,
}

impl PricedLine for OrderItem {
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

/// One entry of an order's append-only status history.
#[derive(Debug, Clone)]
pub struct OrderStatusLog {
    pub uuid: OrderStatusLogUuid,
    pub order_uuid: OrderUuid,

    /// `None` only for the entry written at creation.
    pub from_status: Option<OrderStatus>,
    pub to_status: OrderStatus,
    pub actor_uuid: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// Customer-supplied checkout fields.
#[derive(Debug, Clone, Default)]
pub struct CheckoutDetails {
    pub shipping_address: Option<Value>,
    pub billing_address: Option<Value>,
    pub notes: Option<String>,
}

/// A requested status change.
#[derive(Debug, Clone)]
pub struct StatusTransition {
    pub to: OrderStatus,

    /// Staff member or system performing the change.
    pub actor: Option<Uuid>,
    pub note: Option<String>,
}

/// Filter and page of a user's order listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            status: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl OrderFilter {
    /// Pulls the page to at least 1 and the page size into `1..=100`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            status: self.status,
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub(crate) fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }
}

/// An order as it appears in a listing.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub uuid: OrderUuid,
    pub order_number: OrderNumber,
    pub status: OrderStatus,
    pub total: Decimal,
    pub currency: Currency,
    pub item_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One page of a user's orders, newest first.
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<OrderSummary>,

    /// Orders matching the filter across all pages.
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_clamps_page_and_page_size() {
        let filter = OrderFilter {
            status: None,
            page: 0,
            per_page: 500,
        }
        .clamped();

        assert_eq!(filter.page, 1);
        assert_eq!(filter.per_page, MAX_PER_PAGE);

        let filter = OrderFilter {
            per_page: 0,
            ..OrderFilter::default()
        }
        .clamped();

        assert_eq!(filter.per_page, 1);
    }

    #[test]
    fn filter_offset_skips_previous_pages() {
        let filter = OrderFilter {
            status: None,
            page: 3,
            per_page: 20,
        };

        assert_eq!(filter.limit(), 20);
        assert_eq!(filter.offset(), 40);
    }
}
