use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::cart_dto::{CartLineResponse, CartResponse};
use crate::model::cart::Cart;
use crate::model::menu::MenuItem;
use crate::repository::cart_repo::CartRepository;
use crate::repository::menu_repo::MenuRepository;
use crate::util::error::ServiceError;
use crate::util::money::round2;

#[async_trait]
pub trait CartService: Send + Sync {
    async fn get(&self, user_id: &ObjectId) -> Result<CartResponse, ServiceError>;
    async fn add_item(
        &self,
        user_id: &ObjectId,
        menu_item_id: &ObjectId,
        qty: f64,
    ) -> Result<CartResponse, ServiceError>;
    async fn set_qty(
        &self,
        user_id: &ObjectId,
        menu_item_id: &ObjectId,
        qty: f64,
    ) -> Result<CartResponse, ServiceError>;
    async fn remove_item(
        &self,
        user_id: &ObjectId,
        menu_item_id: &ObjectId,
    ) -> Result<CartResponse, ServiceError>;
    async fn clear(&self, user_id: &ObjectId) -> Result<CartResponse, ServiceError>;
}

pub struct CartServiceImpl {
    pub cart_repo: Arc<dyn CartRepository>,
    pub menu_repo: Arc<dyn MenuRepository>,
}

impl CartServiceImpl {
    pub fn new(cart_repo: Arc<dyn CartRepository>, menu_repo: Arc<dyn MenuRepository>) -> Self {
        Self { cart_repo, menu_repo }
    }

    async fn load_or_create(&self, user_id: &ObjectId) -> Result<Cart, ServiceError> {
        match self.cart_repo.find_by_user(user_id).await? {
            Some(cart) => Ok(cart),
            None => Ok(self.cart_repo.create_empty(*user_id).await?),
        }
    }

    /// Resolves cart lines against the live menu. Lines whose menu item no
    /// longer exists are dropped from the stored cart on the way through.
    async fn resolve(&self, cart: Cart) -> Result<CartResponse, ServiceError> {
        let ids: Vec<ObjectId> = cart.items.iter().map(|line| line.menu_item).collect();
        let menu_items = self.menu_repo.find_many(&ids).await?;
        let by_id: HashMap<ObjectId, MenuItem> = menu_items
            .into_iter()
            .filter_map(|item| item.id.map(|id| (id, item)))
            .collect();

        let mut lines = Vec::with_capacity(cart.items.len());
        let mut kept = Vec::with_capacity(cart.items.len());
        let mut subtotal = 0.0;
        for line in &cart.items {
            let Some(item) = by_id.get(&line.menu_item) else {
                continue;
            };
            let line_total = round2(item.price * line.qty as f64);
            subtotal += line_total;
            lines.push(CartLineResponse {
                menu_item_id: line.menu_item.to_hex(),
                title: item.title.clone(),
                price: item.price,
                qty: line.qty,
                image_url: item.image_url.clone(),
                available: item.is_available,
                line_total,
            });
            kept.push(line.clone());
        }

        if kept.len() != cart.items.len() {
            info!("Pruning cart lines for deleted menu items");
            self.cart_repo.set_items(&cart.user, &kept).await?;
        }

        Ok(CartResponse {
            items: lines,
            subtotal: round2(subtotal),
        })
    }
}

#[async_trait]
impl CartService for CartServiceImpl {
    async fn get(&self, user_id: &ObjectId) -> Result<CartResponse, ServiceError> {
        let cart = self.load_or_create(user_id).await?;
        self.resolve(cart).await
    }

    #[instrument(skip(self), fields(user = %user_id, item = %menu_item_id, qty = qty))]
    async fn add_item(
        &self,
        user_id: &ObjectId,
        menu_item_id: &ObjectId,
        qty: f64,
    ) -> Result<CartResponse, ServiceError> {
        let item = self
            .menu_repo
            .find_by_id(menu_item_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Menu item not found".to_string()))?;
        if !item.is_available {
            return Err(ServiceError::InvalidInput(
                "This menu item is currently unavailable".to_string(),
            ));
        }

        let mut cart = self.load_or_create(user_id).await?;
        cart.add_item(*menu_item_id, qty);
        self.cart_repo.set_items(user_id, &cart.items).await?;
        self.resolve(cart).await
    }

    #[instrument(skip(self), fields(user = %user_id, item = %menu_item_id, qty = qty))]
    async fn set_qty(
        &self,
        user_id: &ObjectId,
        menu_item_id: &ObjectId,
        qty: f64,
    ) -> Result<CartResponse, ServiceError> {
        let mut cart = self
            .cart_repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Cart is empty".to_string()))?;
        if !cart.set_qty(*menu_item_id, qty) {
            return Err(ServiceError::NotFound("Item is not in the cart".to_string()));
        }
        self.cart_repo.set_items(user_id, &cart.items).await?;
        self.resolve(cart).await
    }

    #[instrument(skip(self), fields(user = %user_id, item = %menu_item_id))]
    async fn remove_item(
        &self,
        user_id: &ObjectId,
        menu_item_id: &ObjectId,
    ) -> Result<CartResponse, ServiceError> {
        let mut cart = self
            .cart_repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Cart is empty".to_string()))?;
        if !cart.remove_item(*menu_item_id) {
            return Err(ServiceError::NotFound("Item is not in the cart".to_string()));
        }
        self.cart_repo.set_items(user_id, &cart.items).await?;
        self.resolve(cart).await
    }

    #[instrument(skip(self), fields(user = %user_id))]
    async fn clear(&self, user_id: &ObjectId) -> Result<CartResponse, ServiceError> {
        let mut cart = self.load_or_create(user_id).await?;
        if !cart.items.is_empty() {
            cart.items.clear();
            self.cart_repo.set_items(user_id, &cart.items).await?;
        }
        Ok(CartResponse {
            items: Vec::new(),
            subtotal: 0.0,
        })
    }
}
