//! Order request and response payloads.

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trolley::configuration::Configuration;
use trolley_app::domain::orders::models::{
    CheckoutDetails, Order, OrderItem, OrderPage, OrderStatusLog, OrderSummary,
};
use uuid::Uuid;

use crate::carts::models::money;

/// Checkout Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    /// Opaque shipping address
    #[serde(default, alias = "shippingAddress")]
    #[salvo(schema(value_type = Option<Object>))]
    pub shipping_address: Option<Value>,

    /// Opaque billing address
    #[serde(default, alias = "billingAddress")]
    #[salvo(schema(value_type = Option<Object>))]
    pub billing_address: Option<Value>,

    /// Free-form customer notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CheckoutRequest> for CheckoutDetails {
    fn from(request: CheckoutRequest) -> Self {
        CheckoutDetails {
            shipping_address: request.shipping_address,
            billing_address: request.billing_address,
            notes: request.notes,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub id: Uuid,

    /// Human-readable order number, `ORD-YYYYMMDD-NNNN`
    pub order_number: String,

    pub user_id: Uuid,

    /// The cart the order was placed from
    pub cart_id: Option<Uuid>,

    /// Lifecycle status
    pub status: String,

    #[salvo(schema(value_type = String))]
    pub subtotal: Decimal,

    #[salvo(schema(value_type = String))]
    pub tax: Decimal,

    #[salvo(schema(value_type = String))]
    pub total: Decimal,

    /// ISO 4217 currency code
    pub currency: String,

    #[salvo(schema(value_type = Option<Object>))]
    pub shipping_address: Option<Value>,

    #[salvo(schema(value_type = Option<Object>))]
    pub billing_address: Option<Value>,

    pub notes: Option<String>,

    /// Line items frozen at checkout
    pub items: Vec<OrderItemResponse>,

    /// Status changes, oldest first
    pub history: Vec<OrderStatusLogResponse>,

    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.uuid.into_uuid(),
            order_number: order.order_number.as_str().to_string(),
            user_id: order.user_uuid.into_uuid(),
            cart_id: order.cart_uuid.map(Into::into),
            status: order.status.as_str().to_string(),
            subtotal: money(order.subtotal, &order.currency),
            tax: money(order.tax, &order.currency),
            total: money(order.total, &order.currency),
            currency: order.currency.to_string(),
            shipping_address: order.shipping_address,
            billing_address: order.billing_address,
            notes: order.notes,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            history: order
                .history
                .into_iter()
                .map(OrderStatusLogResponse::from)
                .collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_type: String,
    pub name: String,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub quantity: u32,

    #[salvo(schema(value_type = String))]
    pub unit_price: Decimal,

    #[salvo(schema(value_type = String))]
    pub total_price: Decimal,

    pub currency: String,

    #[salvo(schema(value_type = Option<Object>))]
    pub configuration: Option<Configuration>,

    pub created_at: String,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.uuid.into_uuid(),
            product_id: item.product_uuid,
            variant_id: item.variant_uuid,
            product_type: item.product_type.as_str().to_string(),
            name: item.name,
            sku: item.sku,
            image_url: item.image_url,
            quantity: item.quantity,
            unit_price: money(item.unit_price, &item.currency),
            total_price: money(item.total_price, &item.currency),
            currency: item.currency.to_string(),
            configuration: item.configuration,
            created_at: item.created_at.to_string(),
        }
    }
}

/// Order Status Change Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderStatusLogResponse {
    /// Previous status; absent for the creation entry
    pub from_status: Option<String>,
    pub to_status: String,

    /// Who made the change
    pub actor_id: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: String,
}

impl From<OrderStatusLog> for OrderStatusLogResponse {
    fn from(log: OrderStatusLog) -> Self {
        Self {
            from_status: log.from_status.map(|status| status.as_str().to_string()),
            to_status: log.to_status.as_str().to_string(),
            actor_id: log.actor_uuid,
            note: log.note,
            created_at: log.created_at.to_string(),
        }
    }
}

/// Order Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderSummaryResponse {
    pub id: Uuid,
    pub order_number: String,
    pub status: String,

    #[salvo(schema(value_type = String))]
    pub total: Decimal,

    pub currency: String,

    /// Number of line items
    pub item_count: u32,

    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(summary: OrderSummary) -> Self {
        Self {
            id: summary.uuid.into_uuid(),
            order_number: summary.order_number.as_str().to_string(),
            status: summary.status.as_str().to_string(),
            total: money(summary.total, &summary.currency),
            currency: summary.currency.to_string(),
            item_count: summary.item_count,
            created_at: summary.created_at.to_string(),
            updated_at: summary.updated_at.to_string(),
        }
    }
}

/// Order Page Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderPageResponse {
    pub orders: Vec<OrderSummaryResponse>,

    /// Orders matching the filter across all pages
    pub total: u64,

    pub page: u32,
    pub per_page: u32,
}

impl From<OrderPage> for OrderPageResponse {
    fn from(page: OrderPage) -> Self {
        Self {
            orders: page
                .orders
                .into_iter()
                .map(OrderSummaryResponse::from)
                .collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
        }
    }
}
