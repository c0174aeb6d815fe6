use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::category_dto::{
    CategoryResponse, CreateCategoryRequest, ReorderCategoriesRequest, UpdateCategoryRequest,
};
use crate::model::category::{slugify, MenuCategory, DEFAULT_CATEGORIES};
use crate::repository::category_repo::CategoryRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Startup step: inserts the default category set when the collection
    /// is empty. Safe to call on every boot.
    async fn seed_defaults(&self) -> Result<(), ServiceError>;
    async fn create(&self, request: CreateCategoryRequest) -> Result<CategoryResponse, ServiceError>;
    async fn update(
        &self,
        category_id: &ObjectId,
        request: UpdateCategoryRequest,
    ) -> Result<CategoryResponse, ServiceError>;
    async fn delete(&self, category_id: &ObjectId) -> Result<(), ServiceError>;
    async fn get(&self, category_id: &ObjectId) -> Result<CategoryResponse, ServiceError>;
    /// Public listing shows active categories only; staff see everything.
    async fn list(&self, include_inactive: bool) -> Result<Vec<CategoryResponse>, ServiceError>;
    async fn reorder(&self, request: ReorderCategoriesRequest) -> Result<Vec<CategoryResponse>, ServiceError>;
}

pub struct CategoryServiceImpl {
    pub category_repo: Arc<dyn CategoryRepository>,
}

impl CategoryServiceImpl {
    pub fn new(category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { category_repo }
    }
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    #[instrument(skip(self))]
    async fn seed_defaults(&self) -> Result<(), ServiceError> {
        if self.category_repo.count().await? > 0 {
            return Ok(());
        }
        let categories: Vec<MenuCategory> = DEFAULT_CATEGORIES
            .iter()
            .enumerate()
            .map(|(i, name)| MenuCategory {
                id: None,
                name: name.to_string(),
                slug: slugify(name),
                order: i as i32 + 1,
                is_active: true,
                created_at: None,
                updated_at: None,
            })
            .collect();
        self.category_repo.insert_many(categories).await?;
        info!("Default categories seeded");
        Ok(())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create(&self, request: CreateCategoryRequest) -> Result<CategoryResponse, ServiceError> {
        let name = request.name.trim().to_string();
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Category name must contain letters or digits".to_string(),
            ));
        }
        if self
            .category_repo
            .find_by_name_or_slug(&name, &slug)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(
                "A category with this name already exists".to_string(),
            ));
        }

        let order = match request.order {
            Some(order) => order,
            None => self.category_repo.max_order().await? + 1,
        };
        let category = MenuCategory {
            id: None,
            name,
            slug,
            order,
            is_active: request.is_active.unwrap_or(true),
            created_at: None,
            updated_at: None,
        };
        let inserted = self.category_repo.insert(category).await?;
        info!("Category created");
        Ok(CategoryResponse::from(inserted))
    }

    #[instrument(skip(self, request), fields(id = %category_id))]
    async fn update(
        &self,
        category_id: &ObjectId,
        request: UpdateCategoryRequest,
    ) -> Result<CategoryResponse, ServiceError> {
        let mut category = self
            .category_repo
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Category not found".to_string()))?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            let slug = slugify(&name);
            if slug.is_empty() {
                return Err(ServiceError::InvalidInput(
                    "Category name must contain letters or digits".to_string(),
                ));
            }
            if let Some(existing) = self.category_repo.find_by_name_or_slug(&name, &slug).await? {
                if existing.id != category.id {
                    return Err(ServiceError::Conflict(
                        "A category with this name already exists".to_string(),
                    ));
                }
            }
            category.name = name;
            category.slug = slug;
        }
        if let Some(order) = request.order {
            category.order = order;
        }
        if let Some(is_active) = request.is_active {
            category.is_active = is_active;
        }

        let updated = self.category_repo.update(*category_id, category).await?;
        Ok(CategoryResponse::from(updated))
    }

    #[instrument(skip(self), fields(id = %category_id))]
    async fn delete(&self, category_id: &ObjectId) -> Result<(), ServiceError> {
        self.category_repo.delete(*category_id).await?;
        info!("Category deleted");
        Ok(())
    }

    async fn get(&self, category_id: &ObjectId) -> Result<CategoryResponse, ServiceError> {
        let category = self
            .category_repo
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Category not found".to_string()))?;
        Ok(CategoryResponse::from(category))
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<CategoryResponse>, ServiceError> {
        let categories = self.category_repo.find_all(!include_inactive).await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    #[instrument(skip(self, request), fields(count = request.items.len()))]
    async fn reorder(
        &self,
        request: ReorderCategoriesRequest,
    ) -> Result<Vec<CategoryResponse>, ServiceError> {
        for entry in &request.items {
            let id = ObjectId::parse_str(&entry.id).map_err(|_| {
                ServiceError::InvalidInput(format!("Invalid category id: {}", entry.id))
            })?;
            self.category_repo.set_order(&id, entry.order).await?;
        }
        info!("Categories reordered");
        self.list(true).await
    }
}
