use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::config::CheckoutConfig;
use crate::dto::address_dto::CreateAddressRequest;
use crate::dto::order_dto::{
    CheckoutRequest, CheckoutResponse, OrderListQuery, OrderListResponse, OrderResponse,
};
use crate::model::address::Address;
use crate::model::order::{
    AddressSnapshot, DeliveryMethod, Order, OrderItem, OrderStatus, PaymentStatus,
};
use crate::repository::address_repo::AddressRepository;
use crate::repository::cart_repo::CartRepository;
use crate::repository::menu_repo::MenuRepository;
use crate::repository::order_repo::{OrderFilter, OrderRepository};
use crate::util::error::ServiceError;
use crate::util::money::round2;

const LIST_LIMIT_CAP: u32 = 100;

/// Money breakdown for one checkout. Every component is rounded to cents
/// before it enters the total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub service_fee: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
}

pub fn compute_totals(subtotal: f64, method: DeliveryMethod, config: &CheckoutConfig) -> Totals {
    let subtotal = round2(subtotal);
    let delivery_fee = match method {
        DeliveryMethod::Delivery => round2(config.delivery_fee_flat),
        DeliveryMethod::Pickup => 0.0,
    };
    let service_fee = round2(subtotal * config.service_fee_rate);
    let tax = round2(subtotal * config.tax_rate);
    let discount = 0.0;
    let total = round2(subtotal + delivery_fee + service_fee + tax - discount);
    Totals {
        subtotal,
        delivery_fee,
        service_fee,
        tax,
        discount,
        total,
    }
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn checkout(
        &self,
        user_id: &ObjectId,
        request: CheckoutRequest,
    ) -> Result<CheckoutResponse, ServiceError>;
    async fn list(
        &self,
        user_id: &ObjectId,
        is_staff: bool,
        query: OrderListQuery,
    ) -> Result<OrderListResponse, ServiceError>;
    async fn get(
        &self,
        user_id: &ObjectId,
        is_staff: bool,
        order_id: &ObjectId,
    ) -> Result<OrderResponse, ServiceError>;
    async fn cancel(
        &self,
        user_id: &ObjectId,
        is_staff: bool,
        order_id: &ObjectId,
    ) -> Result<OrderResponse, ServiceError>;
    /// Staff only: advance an order along the fulfilment sequence.
    async fn update_status(
        &self,
        order_id: &ObjectId,
        status: &str,
    ) -> Result<OrderResponse, ServiceError>;
}

pub struct OrderServiceImpl {
    pub order_repo: Arc<dyn OrderRepository>,
    pub cart_repo: Arc<dyn CartRepository>,
    pub menu_repo: Arc<dyn MenuRepository>,
    pub address_repo: Arc<dyn AddressRepository>,
    pub checkout_config: CheckoutConfig,
}

impl OrderServiceImpl {
    pub fn new(
        order_repo: Arc<dyn OrderRepository>,
        cart_repo: Arc<dyn CartRepository>,
        menu_repo: Arc<dyn MenuRepository>,
        address_repo: Arc<dyn AddressRepository>,
        checkout_config: CheckoutConfig,
    ) -> Self {
        Self {
            order_repo,
            cart_repo,
            menu_repo,
            address_repo,
            checkout_config,
        }
    }

    /// Picks the delivery address: explicit id first, then the inline
    /// address. A delivery checkout with neither fails; the saved default is
    /// never used implicitly. Returns the snapshot plus the saved address id
    /// when one was used.
    async fn resolve_address(
        &self,
        user_id: &ObjectId,
        request: &CheckoutRequest,
    ) -> Result<(AddressSnapshot, Option<ObjectId>), ServiceError> {
        if let Some(ref raw_id) = request.address_id {
            let address_id = ObjectId::parse_str(raw_id)
                .map_err(|_| ServiceError::InvalidInput("Invalid address id".to_string()))?;
            let address = self
                .address_repo
                .find_for_user(&address_id, user_id)
                .await?
                .ok_or_else(|| ServiceError::InvalidInput("Address not found".to_string()))?;
            return Ok((snapshot_from(&address), Some(address_id)));
        }

        if let Some(ref inline) = request.address {
            let snapshot = snapshot_from_request(inline)?;
            if request.save_address.unwrap_or(false) {
                let is_default = self.address_repo.count_for_user(user_id).await? == 0;
                let saved = self
                    .address_repo
                    .insert(Address {
                        id: None,
                        user: *user_id,
                        label: snapshot.label.clone(),
                        full_name: snapshot.full_name.clone(),
                        phone: snapshot.phone.clone(),
                        line1: snapshot.line1.clone(),
                        line2: snapshot.line2.clone(),
                        city: snapshot.city.clone(),
                        state: snapshot.state.clone(),
                        postal_code: snapshot.postal_code.clone(),
                        is_default,
                        created_at: None,
                        updated_at: None,
                    })
                    .await?;
                return Ok((snapshot, saved.id));
            }
            return Ok((snapshot, None));
        }

        Err(ServiceError::InvalidInput(
            "A delivery address is required".to_string(),
        ))
    }
}

fn snapshot_from(address: &Address) -> AddressSnapshot {
    AddressSnapshot {
        label: address.label.clone(),
        full_name: address.full_name.clone(),
        phone: address.phone.clone(),
        line1: address.line1.clone(),
        line2: address.line2.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        postal_code: address.postal_code.clone(),
    }
}

/// Turns an inline checkout address into a snapshot. Every required field
/// must be non-empty once trimmed; the trimmed values are what get stored.
fn snapshot_from_request(
    request: &CreateAddressRequest,
) -> Result<AddressSnapshot, ServiceError> {
    let required = [
        &request.full_name,
        &request.phone,
        &request.line1,
        &request.city,
        &request.state,
        &request.postal_code,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(ServiceError::InvalidInput(
            "Incomplete delivery address".to_string(),
        ));
    }
    Ok(AddressSnapshot {
        label: request
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("Home")
            .to_string(),
        full_name: request.full_name.trim().to_string(),
        phone: request.phone.trim().to_string(),
        line1: request.line1.trim().to_string(),
        line2: request
            .line2
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string),
        city: request.city.trim().to_string(),
        state: request.state.trim().to_string(),
        postal_code: request.postal_code.trim().to_string(),
    })
}

fn validate_schedule(schedule_at: &Option<String>) -> Result<Option<String>, ServiceError> {
    let Some(ref raw) = schedule_at else {
        return Ok(None);
    };
    let instant = DateTime::parse_from_rfc3339(raw).map_err(|_| {
        ServiceError::InvalidInput("schedule_at must be an RFC3339 timestamp".to_string())
    })?;
    if instant.with_timezone(&Utc) <= Utc::now() {
        return Err(ServiceError::InvalidInput(
            "schedule_at must be in the future".to_string(),
        ));
    }
    Ok(Some(raw.clone()))
}

fn validate_range_bound(
    raw: &Option<String>,
    name: &str,
) -> Result<Option<String>, ServiceError> {
    let Some(ref value) = raw else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(value).map_err(|_| {
        ServiceError::InvalidInput(format!("{} must be an RFC3339 timestamp", name))
    })?;
    Ok(Some(value.clone()))
}

#[async_trait]
impl OrderService for OrderServiceImpl {
    #[instrument(skip(self, request), fields(user = %user_id))]
    async fn checkout(
        &self,
        user_id: &ObjectId,
        request: CheckoutRequest,
    ) -> Result<CheckoutResponse, ServiceError> {
        info!("Checkout started");
        let cart = self
            .cart_repo
            .find_by_user(user_id)
            .await?
            .filter(|cart| !cart.items.is_empty())
            .ok_or_else(|| ServiceError::InvalidInput("Cart is empty".to_string()))?;

        let ids: Vec<ObjectId> = cart.items.iter().map(|line| line.menu_item).collect();
        let menu_items = self.menu_repo.find_many(&ids).await?;
        let by_id: HashMap<ObjectId, _> = menu_items
            .into_iter()
            .filter_map(|item| item.id.map(|id| (id, item)))
            .collect();

        // Snapshot lines at current prices. Lines whose menu item was deleted
        // since they were added are dropped; the checkout only fails when
        // nothing resolvable is left.
        let mut order_items = Vec::with_capacity(cart.items.len());
        let mut subtotal = 0.0;
        for line in &cart.items {
            let Some(item) = by_id.get(&line.menu_item) else {
                continue;
            };
            subtotal += round2(item.price * line.qty as f64);
            order_items.push(OrderItem {
                menu_item_id: line.menu_item,
                title: item.title.clone(),
                price: item.price,
                qty: line.qty,
                image_url: item.image_url.clone(),
            });
        }
        if order_items.is_empty() {
            return Err(ServiceError::InvalidInput("Cart is empty".to_string()));
        }

        let method = request.method.unwrap_or_default();
        let totals = compute_totals(subtotal, method, &self.checkout_config);
        let schedule_at = validate_schedule(&request.schedule_at)?;

        let (address, address_id) = match method {
            DeliveryMethod::Delivery => {
                let (snapshot, id) = self.resolve_address(user_id, &request).await?;
                (Some(snapshot), id)
            }
            DeliveryMethod::Pickup => (None, None),
        };

        let order = Order {
            id: None,
            user: *user_id,
            items: order_items,
            method,
            address,
            address_id,
            schedule_at,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            service_fee: totals.service_fee,
            tax: totals.tax,
            discount: totals.discount,
            total: totals.total,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_method_id: request.payment_method_id,
            created_at: None,
            updated_at: None,
        };
        let inserted = self.order_repo.insert(order).await?;

        self.cart_repo.set_items(user_id, &[]).await?;

        info!(total = inserted.total, "Order placed");
        Ok(CheckoutResponse::from(inserted))
    }

    async fn list(
        &self,
        user_id: &ObjectId,
        is_staff: bool,
        query: OrderListQuery,
    ) -> Result<OrderListResponse, ServiceError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).clamp(1, LIST_LIMIT_CAP);

        let filter = if is_staff {
            let user = match query.user_id {
                Some(ref raw) => Some(ObjectId::parse_str(raw).map_err(|_| {
                    ServiceError::InvalidInput("Invalid user id filter".to_string())
                })?),
                None => None,
            };
            let status = match query.status {
                Some(ref raw) => Some(OrderStatus::parse(raw).ok_or_else(|| {
                    ServiceError::InvalidInput(format!("Unknown order status: {}", raw))
                })?),
                None => None,
            };
            let created_from = validate_range_bound(&query.from, "from")?;
            let created_to = validate_range_bound(&query.to, "to")?;
            OrderFilter {
                user,
                status,
                created_from,
                created_to,
            }
        } else {
            // Customers only ever see their own orders.
            OrderFilter {
                user: Some(*user_id),
                ..OrderFilter::default()
            }
        };

        let orders = self.order_repo.list(&filter, page, limit).await?;
        let total = self.order_repo.count(&filter).await?;
        Ok(OrderListResponse {
            orders: orders.into_iter().map(OrderResponse::from).collect(),
            total,
            page,
            limit,
        })
    }

    async fn get(
        &self,
        user_id: &ObjectId,
        is_staff: bool,
        order_id: &ObjectId,
    ) -> Result<OrderResponse, ServiceError> {
        let order = self
            .order_repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;
        if !is_staff && order.user != *user_id {
            return Err(ServiceError::Forbidden(
                "You do not have access to this order".to_string(),
            ));
        }
        Ok(OrderResponse::from(order))
    }

    #[instrument(skip(self), fields(user = %user_id, order = %order_id))]
    async fn cancel(
        &self,
        user_id: &ObjectId,
        is_staff: bool,
        order_id: &ObjectId,
    ) -> Result<OrderResponse, ServiceError> {
        let mut order = self
            .order_repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;
        if !is_staff && order.user != *user_id {
            return Err(ServiceError::Forbidden(
                "You do not have access to this order".to_string(),
            ));
        }
        if !order.status.can_cancel() {
            return Err(ServiceError::InvalidInput(format!(
                "Order in status \"{}\" can no longer be cancelled",
                order.status.as_str()
            )));
        }
        self.order_repo
            .update_status(order_id, OrderStatus::Cancelled)
            .await?;
        order.status = OrderStatus::Cancelled;
        info!("Order cancelled");
        Ok(OrderResponse::from(order))
    }

    #[instrument(skip(self), fields(order = %order_id, status = %status))]
    async fn update_status(
        &self,
        order_id: &ObjectId,
        status: &str,
    ) -> Result<OrderResponse, ServiceError> {
        let next = OrderStatus::parse(status)
            .ok_or_else(|| ServiceError::InvalidInput(format!("Unknown order status: {}", status)))?;
        let mut order = self
            .order_repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;
        if !order.status.can_transition_to(next) {
            return Err(ServiceError::InvalidInput(format!(
                "Cannot move order from \"{}\" to \"{}\"",
                order.status.as_str(),
                next.as_str()
            )));
        }
        self.order_repo.update_status(order_id, next).await?;
        order.status = next;
        info!("Order status updated");
        Ok(OrderResponse::from(order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CheckoutConfig {
        CheckoutConfig::default()
    }

    #[test]
    fn test_pickup_totals() {
        let totals = compute_totals(25.0, DeliveryMethod::Pickup, &config());
        assert_eq!(totals.subtotal, 25.0);
        assert_eq!(totals.delivery_fee, 0.0);
        assert_eq!(totals.service_fee, 1.25);
        assert_eq!(totals.tax, 2.0);
        assert_eq!(totals.total, 28.25);
    }

    #[test]
    fn test_delivery_totals() {
        let totals = compute_totals(25.0, DeliveryMethod::Delivery, &config());
        assert_eq!(totals.delivery_fee, 4.99);
        assert_eq!(totals.total, 33.24);
    }

    #[test]
    fn test_totals_round_each_component() {
        // 19.98 * 0.05 = 0.999 -> 1.00; 19.98 * 0.08 = 1.5984 -> 1.60
        let totals = compute_totals(19.98, DeliveryMethod::Pickup, &config());
        assert_eq!(totals.subtotal, 19.98);
        assert_eq!(totals.service_fee, 1.0);
        assert_eq!(totals.tax, 1.6);
        assert_eq!(totals.total, 22.58);
    }

    #[test]
    fn test_schedule_validation() {
        assert_eq!(validate_schedule(&None).unwrap(), None);
        assert!(validate_schedule(&Some("tomorrow".to_string())).is_err());
        assert!(validate_schedule(&Some("2001-01-01T00:00:00Z".to_string())).is_err());
        let future = (Utc::now() + chrono::Duration::hours(2)).to_rfc3339();
        assert!(validate_schedule(&Some(future)).unwrap().is_some());
    }

    #[test]
    fn test_range_bounds_must_be_rfc3339() {
        assert_eq!(validate_range_bound(&None, "from").unwrap(), None);
        assert!(validate_range_bound(&Some("yesterday".to_string()), "from").is_err());
        let bound = Some("2026-01-01T00:00:00Z".to_string());
        assert_eq!(validate_range_bound(&bound, "to").unwrap(), bound);
    }

    #[test]
    fn test_blank_inline_address_is_incomplete() {
        let request = CreateAddressRequest {
            label: None,
            full_name: "   ".to_string(),
            phone: " ".to_string(),
            line1: "  ".to_string(),
            line2: None,
            city: " ".to_string(),
            state: " ".to_string(),
            postal_code: "  ".to_string(),
            is_default: None,
        };
        assert!(snapshot_from_request(&request).is_err());
    }

    #[test]
    fn test_inline_address_is_trimmed() {
        let request = CreateAddressRequest {
            label: Some("  Work ".to_string()),
            full_name: " Asha Rao ".to_string(),
            phone: " 5550001 ".to_string(),
            line1: " 12 Baker St ".to_string(),
            line2: Some("   ".to_string()),
            city: " Pune ".to_string(),
            state: " MH ".to_string(),
            postal_code: " 411001 ".to_string(),
            is_default: None,
        };
        let snapshot = snapshot_from_request(&request).unwrap();
        assert_eq!(snapshot.label, "Work");
        assert_eq!(snapshot.full_name, "Asha Rao");
        assert_eq!(snapshot.line1, "12 Baker St");
        assert_eq!(snapshot.line2, None);
        assert_eq!(snapshot.postal_code, "411001");
    }
}
