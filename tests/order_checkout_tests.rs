use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bson::oid::ObjectId;

use cloudkitchen_backend::config::CheckoutConfig;
use cloudkitchen_backend::dto::address_dto::CreateAddressRequest;
use cloudkitchen_backend::dto::order_dto::{CheckoutRequest, OrderListQuery};
use cloudkitchen_backend::model::address::Address;
use cloudkitchen_backend::model::cart::{Cart, CartItem};
use cloudkitchen_backend::model::menu::MenuItem;
use cloudkitchen_backend::model::order::{DeliveryMethod, Order, OrderStatus, PaymentStatus};
use cloudkitchen_backend::repository::address_repo::AddressRepository;
use cloudkitchen_backend::repository::cart_repo::CartRepository;
use cloudkitchen_backend::repository::menu_repo::{MenuFilter, MenuRepository};
use cloudkitchen_backend::repository::order_repo::{OrderFilter, OrderRepository};
use cloudkitchen_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use cloudkitchen_backend::service::order_service::{OrderService, OrderServiceImpl};
use cloudkitchen_backend::util::error::ServiceError;

#[derive(Default)]
struct InMemoryOrders {
    orders: Mutex<Vec<Order>>,
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn insert(&self, mut order: Order) -> RepositoryResult<Order> {
        order.id = Some(ObjectId::new());
        self.orders.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id.as_ref() == Some(id))
            .cloned())
    }

    async fn list(&self, filter: &OrderFilter, _page: u32, _limit: u32) -> RepositoryResult<Vec<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| filter.user.map_or(true, |u| o.user == u))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &OrderFilter) -> RepositoryResult<u64> {
        Ok(self.list(filter, 1, u32::MAX).await?.len() as u64)
    }

    async fn update_status(&self, id: &ObjectId, status: OrderStatus) -> RepositoryResult<()> {
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.id.as_ref() == Some(id)) {
            Some(order) => {
                order.status = status;
                Ok(())
            }
            None => Err(RepositoryError::not_found("No such order")),
        }
    }
}

#[derive(Default)]
struct InMemoryCarts {
    carts: Mutex<Vec<Cart>>,
}

#[async_trait]
impl CartRepository for InMemoryCarts {
    async fn find_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Option<Cart>> {
        Ok(self
            .carts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user == *user_id)
            .cloned())
    }

    async fn create_empty(&self, user_id: ObjectId) -> RepositoryResult<Cart> {
        let cart = Cart {
            id: Some(ObjectId::new()),
            user: user_id,
            items: Vec::new(),
            created_at: None,
            updated_at: None,
        };
        self.carts.lock().unwrap().push(cart.clone());
        Ok(cart)
    }

    async fn set_items(&self, user_id: &ObjectId, items: &[CartItem]) -> RepositoryResult<()> {
        let mut carts = self.carts.lock().unwrap();
        match carts.iter_mut().find(|c| c.user == *user_id) {
            Some(cart) => {
                cart.items = items.to_vec();
                Ok(())
            }
            None => Err(RepositoryError::not_found("No such cart")),
        }
    }
}

struct InMemoryMenu {
    items: Vec<MenuItem>,
}

#[async_trait]
impl MenuRepository for InMemoryMenu {
    async fn insert(&self, item: MenuItem) -> RepositoryResult<MenuItem> {
        Ok(item)
    }

    async fn update(&self, _id: ObjectId, item: MenuItem) -> RepositoryResult<MenuItem> {
        Ok(item)
    }

    async fn delete(&self, _id: ObjectId) -> RepositoryResult<()> {
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<MenuItem>> {
        Ok(self.items.iter().find(|i| i.id.as_ref() == Some(id)).cloned())
    }

    async fn find_many(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<MenuItem>> {
        Ok(self
            .items
            .iter()
            .filter(|i| i.id.map_or(false, |id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn list(&self, _filter: &MenuFilter, _page: u32, _limit: u32) -> RepositoryResult<Vec<MenuItem>> {
        Ok(self.items.clone())
    }

    async fn count(&self, _filter: &MenuFilter) -> RepositoryResult<u64> {
        Ok(self.items.len() as u64)
    }
}

#[derive(Default)]
struct InMemoryAddresses {
    addresses: Mutex<Vec<Address>>,
}

#[async_trait]
impl AddressRepository for InMemoryAddresses {
    async fn insert(&self, mut address: Address) -> RepositoryResult<Address> {
        address.id = Some(ObjectId::new());
        self.addresses.lock().unwrap().push(address.clone());
        Ok(address)
    }

    async fn update(&self, id: ObjectId, address: Address) -> RepositoryResult<Address> {
        let mut addresses = self.addresses.lock().unwrap();
        match addresses.iter_mut().find(|a| a.id == Some(id)) {
            Some(slot) => {
                *slot = address.clone();
                Ok(address)
            }
            None => Err(RepositoryError::not_found("No such address")),
        }
    }

    async fn delete(&self, id: ObjectId, user_id: ObjectId) -> RepositoryResult<()> {
        self.addresses
            .lock()
            .unwrap()
            .retain(|a| !(a.id == Some(id) && a.user == user_id));
        Ok(())
    }

    async fn find_for_user(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<Option<Address>> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id.as_ref() == Some(id) && a.user == *user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Address>> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user == *user_id)
            .cloned()
            .collect())
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.list_for_user(user_id).await?.len() as u64)
    }

    async fn clear_default_except(&self, user_id: &ObjectId, keep: &ObjectId) -> RepositoryResult<()> {
        for address in self.addresses.lock().unwrap().iter_mut() {
            if address.user == *user_id && address.id.as_ref() != Some(keep) {
                address.is_default = false;
            }
        }
        Ok(())
    }

    async fn set_default(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<()> {
        for address in self.addresses.lock().unwrap().iter_mut() {
            if address.user == *user_id && address.id.as_ref() == Some(id) {
                address.is_default = true;
            }
        }
        Ok(())
    }

    async fn find_default(&self, user_id: &ObjectId) -> RepositoryResult<Option<Address>> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.user == *user_id && a.is_default)
            .cloned())
    }

    async fn find_most_recent(&self, user_id: &ObjectId) -> RepositoryResult<Option<Address>> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user == *user_id)
            .last()
            .cloned())
    }
}

struct Harness {
    service: OrderServiceImpl,
    orders: Arc<InMemoryOrders>,
    carts: Arc<InMemoryCarts>,
    addresses: Arc<InMemoryAddresses>,
}

fn harness(menu: Vec<MenuItem>) -> Harness {
    let orders = Arc::new(InMemoryOrders::default());
    let carts = Arc::new(InMemoryCarts::default());
    let addresses = Arc::new(InMemoryAddresses::default());
    let service = OrderServiceImpl::new(
        orders.clone(),
        carts.clone(),
        Arc::new(InMemoryMenu { items: menu }),
        addresses.clone(),
        CheckoutConfig::default(),
    );
    Harness {
        service,
        orders,
        carts,
        addresses,
    }
}

fn menu_item(id: ObjectId, title: &str, price: f64) -> MenuItem {
    MenuItem {
        id: Some(id),
        title: title.to_string(),
        description: None,
        price,
        image_url: None,
        category: Some("Mains".to_string()),
        is_available: true,
        created_by: None,
        created_at: None,
        updated_at: None,
    }
}

fn cart_with(user: ObjectId, lines: Vec<(ObjectId, u32)>) -> Cart {
    Cart {
        id: Some(ObjectId::new()),
        user,
        items: lines
            .into_iter()
            .map(|(menu_item, qty)| CartItem { menu_item, qty })
            .collect(),
        created_at: None,
        updated_at: None,
    }
}

fn pickup_request() -> CheckoutRequest {
    CheckoutRequest {
        method: Some(DeliveryMethod::Pickup),
        address_id: None,
        address: None,
        save_address: None,
        schedule_at: None,
        payment_method_id: None,
    }
}

fn inline_address(full_name: &str, line1: &str) -> CreateAddressRequest {
    CreateAddressRequest {
        label: None,
        full_name: full_name.to_string(),
        phone: "5550001111".to_string(),
        line1: line1.to_string(),
        line2: None,
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62704".to_string(),
        is_default: None,
    }
}

#[tokio::test]
async fn test_checkout_creates_pending_unpaid_order() {
    let user = ObjectId::new();
    let item = ObjectId::new();
    let h = harness(vec![menu_item(item, "Paneer Tikka", 10.0)]);
    h.carts.carts.lock().unwrap().push(cart_with(user, vec![(item, 2)]));

    let response = h.service.checkout(&user, pickup_request()).await.unwrap();
    assert_eq!(response.status, "pending");
    assert!(matches!(response.payment_status, PaymentStatus::Unpaid));
    assert_eq!(response.subtotal, 20.0);

    let stored = &h.orders.orders.lock().unwrap()[0];
    assert_eq!(stored.status, OrderStatus::Pending);

    // The item list is not echoed back in the checkout body.
    let body = serde_json::to_value(&response).unwrap();
    assert!(body.get("items").is_none());
}

#[tokio::test]
async fn test_checkout_clears_the_cart() {
    let user = ObjectId::new();
    let item = ObjectId::new();
    let h = harness(vec![menu_item(item, "Dal Fry", 8.5)]);
    h.carts.carts.lock().unwrap().push(cart_with(user, vec![(item, 1)]));

    h.service.checkout(&user, pickup_request()).await.unwrap();
    assert!(h.carts.carts.lock().unwrap()[0].items.is_empty());
}

#[tokio::test]
async fn test_delivery_without_address_is_rejected_even_with_saved_default() {
    let user = ObjectId::new();
    let item = ObjectId::new();
    let h = harness(vec![menu_item(item, "Biryani", 12.0)]);
    h.carts.carts.lock().unwrap().push(cart_with(user, vec![(item, 1)]));
    h.addresses.addresses.lock().unwrap().push(Address {
        id: Some(ObjectId::new()),
        user,
        label: "Home".to_string(),
        full_name: "Asha Rao".to_string(),
        phone: "5550001111".to_string(),
        line1: "12 Elm Street".to_string(),
        line2: None,
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62704".to_string(),
        is_default: true,
        created_at: None,
        updated_at: None,
    });

    let request = CheckoutRequest {
        method: Some(DeliveryMethod::Delivery),
        ..pickup_request()
    };
    let err = h.service.checkout(&user, request).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(ref msg) if msg.contains("address is required")));
    assert!(h.orders.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_deleted_menu_item_line_is_skipped() {
    let user = ObjectId::new();
    let live = ObjectId::new();
    let deleted = ObjectId::new();
    let h = harness(vec![menu_item(live, "Samosa", 4.0)]);
    h.carts
        .carts
        .lock()
        .unwrap()
        .push(cart_with(user, vec![(live, 3), (deleted, 1)]));

    let response = h.service.checkout(&user, pickup_request()).await.unwrap();
    assert_eq!(response.subtotal, 12.0);

    let stored = &h.orders.orders.lock().unwrap()[0];
    assert_eq!(stored.items.len(), 1);
    assert_eq!(stored.items[0].menu_item_id, live);
}

#[tokio::test]
async fn test_checkout_fails_when_no_line_resolves() {
    let user = ObjectId::new();
    let h = harness(Vec::new());
    h.carts
        .carts
        .lock()
        .unwrap()
        .push(cart_with(user, vec![(ObjectId::new(), 2)]));

    let err = h.service.checkout(&user, pickup_request()).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(ref msg) if msg == "Cart is empty"));
    assert!(h.orders.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_whitespace_inline_address_is_rejected() {
    let user = ObjectId::new();
    let item = ObjectId::new();
    let h = harness(vec![menu_item(item, "Thali", 15.0)]);
    h.carts.carts.lock().unwrap().push(cart_with(user, vec![(item, 1)]));

    let request = CheckoutRequest {
        method: Some(DeliveryMethod::Delivery),
        address: Some(inline_address("        ", "      ")),
        ..pickup_request()
    };
    let err = h.service.checkout(&user, request).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(ref msg) if msg.contains("Incomplete")));
    assert!(h.orders.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_inline_address_saved_trimmed_on_request() {
    let user = ObjectId::new();
    let item = ObjectId::new();
    let h = harness(vec![menu_item(item, "Korma", 11.0)]);
    h.carts.carts.lock().unwrap().push(cart_with(user, vec![(item, 1)]));

    let request = CheckoutRequest {
        method: Some(DeliveryMethod::Delivery),
        address: Some(inline_address(" Asha Rao ", " 12 Elm Street ")),
        save_address: Some(true),
        ..pickup_request()
    };
    let response = h.service.checkout(&user, request).await.unwrap();
    assert!(response.address_id.is_some());

    let saved = &h.addresses.addresses.lock().unwrap()[0];
    assert_eq!(saved.full_name, "Asha Rao");
    assert_eq!(saved.line1, "12 Elm Street");
    // First saved address becomes the default.
    assert!(saved.is_default);
}

#[tokio::test]
async fn test_staff_list_rejects_bad_date_bounds() {
    let user = ObjectId::new();
    let h = harness(Vec::new());
    let query = OrderListQuery {
        page: None,
        limit: None,
        status: None,
        user_id: None,
        from: Some("last tuesday".to_string()),
        to: None,
    };
    let err = h.service.list(&user, true, query).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}
