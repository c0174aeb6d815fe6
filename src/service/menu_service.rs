use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::menu_dto::{
    CreateMenuItemRequest, MenuItemResponse, MenuListQuery, MenuListResponse, UpdateMenuItemRequest,
};
use crate::model::menu::MenuItem;
use crate::repository::menu_repo::{MenuFilter, MenuRepository};
use crate::util::error::ServiceError;

const LIST_LIMIT_CAP: u32 = 100;

#[async_trait]
pub trait MenuService: Send + Sync {
    async fn create(
        &self,
        created_by: &ObjectId,
        request: CreateMenuItemRequest,
    ) -> Result<MenuItemResponse, ServiceError>;
    async fn update(
        &self,
        item_id: &ObjectId,
        request: UpdateMenuItemRequest,
    ) -> Result<MenuItemResponse, ServiceError>;
    async fn delete(&self, item_id: &ObjectId) -> Result<(), ServiceError>;
    async fn get(&self, item_id: &ObjectId) -> Result<MenuItemResponse, ServiceError>;
    async fn list(&self, query: MenuListQuery) -> Result<MenuListResponse, ServiceError>;
}

pub struct MenuServiceImpl {
    pub menu_repo: Arc<dyn MenuRepository>,
}

impl MenuServiceImpl {
    pub fn new(menu_repo: Arc<dyn MenuRepository>) -> Self {
        Self { menu_repo }
    }
}

#[async_trait]
impl MenuService for MenuServiceImpl {
    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create(
        &self,
        created_by: &ObjectId,
        request: CreateMenuItemRequest,
    ) -> Result<MenuItemResponse, ServiceError> {
        let item = MenuItem {
            id: None,
            title: request.title.trim().to_string(),
            description: request.description,
            price: request.price,
            image_url: request.image_url,
            category: request.category,
            is_available: request.is_available.unwrap_or(true),
            created_by: Some(*created_by),
            created_at: None,
            updated_at: None,
        };
        let inserted = self.menu_repo.insert(item).await?;
        info!("Menu item created");
        Ok(MenuItemResponse::from(inserted))
    }

    #[instrument(skip(self, request), fields(id = %item_id))]
    async fn update(
        &self,
        item_id: &ObjectId,
        request: UpdateMenuItemRequest,
    ) -> Result<MenuItemResponse, ServiceError> {
        let mut item = self
            .menu_repo
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Menu item not found".to_string()))?;

        if let Some(title) = request.title {
            item.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            item.description = Some(description);
        }
        if let Some(price) = request.price {
            item.price = price;
        }
        if let Some(image_url) = request.image_url {
            item.image_url = Some(image_url);
        }
        if let Some(category) = request.category {
            item.category = Some(category);
        }
        if let Some(is_available) = request.is_available {
            item.is_available = is_available;
        }

        let updated = self.menu_repo.update(*item_id, item).await?;
        Ok(MenuItemResponse::from(updated))
    }

    #[instrument(skip(self), fields(id = %item_id))]
    async fn delete(&self, item_id: &ObjectId) -> Result<(), ServiceError> {
        self.menu_repo.delete(*item_id).await?;
        info!("Menu item deleted");
        Ok(())
    }

    async fn get(&self, item_id: &ObjectId) -> Result<MenuItemResponse, ServiceError> {
        let item = self
            .menu_repo
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Menu item not found".to_string()))?;
        Ok(MenuItemResponse::from(item))
    }

    async fn list(&self, query: MenuListQuery) -> Result<MenuListResponse, ServiceError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).clamp(1, LIST_LIMIT_CAP);
        let filter = MenuFilter {
            category: query.category,
            available: query.available,
            q: query.q.filter(|q| !q.trim().is_empty()),
        };
        let items = self.menu_repo.list(&filter, page, limit).await?;
        let total = self.menu_repo.count(&filter).await?;
        Ok(MenuListResponse {
            items: items.into_iter().map(MenuItemResponse::from).collect(),
            total,
            page,
            limit,
        })
    }
}
