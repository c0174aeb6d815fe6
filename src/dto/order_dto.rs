use crate::dto::address_dto::CreateAddressRequest;
use crate::model::order::{AddressSnapshot, DeliveryMethod, Order, OrderItem, PaymentStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    /// "delivery" (default) or "pickup"
    pub method: Option<DeliveryMethod>,

    /// Saved address to deliver to; ignored for pickup.
    #[validate(length(equal = 24))]
    pub address_id: Option<String>,

    /// Inline one-off address, used when no `address_id` is given.
    #[validate]
    pub address: Option<CreateAddressRequest>,

    /// Persist the inline address to the address book after checkout.
    pub save_address: Option<bool>,

    /// RFC3339 instant for scheduled orders; absent means ASAP.
    pub schedule_at: Option<String>,

    #[validate(length(max = 100))]
    pub payment_method_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Staff only: filter by status name.
    pub status: Option<String>,
    /// Staff only: restrict to one customer's orders.
    pub user_id: Option<String>,
    /// Staff only: RFC3339 lower bound on creation time.
    pub from: Option<String>,
    /// Staff only: RFC3339 upper bound on creation time.
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub menu_item_id: String,
    pub title: String,
    pub price: f64,
    pub qty: u32,
    pub image_url: Option<String>,
    pub line_total: f64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        let line_total = crate::util::money::round2(item.price * item.qty as f64);
        OrderItemResponse {
            menu_item_id: item.menu_item_id.to_hex(),
            title: item.title,
            price: item.price,
            qty: item.qty,
            image_url: item.image_url,
            line_total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItemResponse>,
    pub method: DeliveryMethod,
    pub address: Option<AddressSnapshot>,
    pub schedule_at: Option<String>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub service_fee: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
    pub status: String,
    pub payment_status: PaymentStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: order.user.to_hex(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            method: order.method,
            address: order.address,
            schedule_at: order.schedule_at,
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            service_fee: order.service_fee,
            tax: order.tax,
            discount: order.discount,
            total: order.total,
            status: order.status.as_str().to_string(),
            payment_status: order.payment_status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Slim checkout reply: identifiers and totals only. The client already
/// holds the cart contents, so the item list is not echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub id: String,
    pub status: String,
    pub payment_status: PaymentStatus,
    pub method: DeliveryMethod,
    pub address_id: Option<String>,
    pub schedule_at: Option<String>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub service_fee: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
}

impl From<Order> for CheckoutResponse {
    fn from(order: Order) -> Self {
        CheckoutResponse {
            id: order.id.map(|id| id.to_hex()).unwrap_or_default(),
            status: order.status.as_str().to_string(),
            payment_status: order.payment_status,
            method: order.method,
            address_id: order.address_id.map(|id| id.to_hex()),
            schedule_at: order.schedule_at,
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            service_fee: order.service_fee,
            tax: order.tax,
            discount: order.discount,
            total: order.total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}
