use crate::model::category::MenuCategory;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Database;
use tracing::{error, info};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: MenuCategory) -> RepositoryResult<MenuCategory>;
    async fn insert_many(&self, categories: Vec<MenuCategory>) -> RepositoryResult<()>;
    async fn update(&self, id: ObjectId, category: MenuCategory) -> RepositoryResult<MenuCategory>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<MenuCategory>>;
    async fn find_by_name_or_slug(&self, name: &str, slug: &str) -> RepositoryResult<Option<MenuCategory>>;
    async fn find_all(&self, only_active: bool) -> RepositoryResult<Vec<MenuCategory>>;
    async fn count(&self) -> RepositoryResult<u64>;
    async fn max_order(&self) -> RepositoryResult<i32>;
    async fn set_order(&self, id: &ObjectId, order: i32) -> RepositoryResult<()>;
}

pub struct MongoCategoryRepository {
    collection: mongodb::Collection<MenuCategory>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        MongoCategoryRepository {
            collection: db.collection::<MenuCategory>("menucategories"),
        }
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[tracing::instrument(skip(self, category), fields(name = %category.name))]
    async fn insert(&self, mut category: MenuCategory) -> RepositoryResult<MenuCategory> {
        category.id = Some(ObjectId::new());
        let now = chrono::Local::now().to_rfc3339();
        category.created_at = Some(now.clone());
        category.updated_at = Some(now);
        match self.collection.insert_one(category.clone(), None).await {
            Ok(_) => {
                info!("Category created");
                Ok(category)
            }
            Err(e) => {
                error!("Failed to insert category: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, categories), fields(count = categories.len()))]
    async fn insert_many(&self, categories: Vec<MenuCategory>) -> RepositoryResult<()> {
        let now = chrono::Local::now().to_rfc3339();
        let stamped: Vec<MenuCategory> = categories
            .into_iter()
            .map(|mut c| {
                c.id = Some(ObjectId::new());
                c.created_at = Some(now.clone());
                c.updated_at = Some(now.clone());
                c
            })
            .collect();
        self.collection
            .insert_many(stamped, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to insert categories: {}", e)))?;
        Ok(())
    }

    #[tracing::instrument(skip(self, category), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut category: MenuCategory) -> RepositoryResult<MenuCategory> {
        category.updated_at = Some(chrono::Local::now().to_rfc3339());
        let filter = doc! { "_id": id };
        let mut doc = bson::to_document(&category).map_err(|e| {
            RepositoryError::serialization(format!("Failed to serialize category: {}", e))
        })?;
        doc.remove("_id");
        let update = doc! { "$set": doc };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(category),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No category found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update category: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        match self.collection.delete_one(filter, None).await {
            Ok(result) if result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No category found to delete for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to delete category: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<MenuCategory>> {
        let filter = doc! { "_id": id };
        let category = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find category: {}", e)))?;
        Ok(category)
    }

    async fn find_by_name_or_slug(
        &self,
        name: &str,
        slug: &str,
    ) -> RepositoryResult<Option<MenuCategory>> {
        let filter = doc! { "$or": [ { "name": name }, { "slug": slug } ] };
        let category = self.collection.find_one(filter, None).await.map_err(|e| {
            RepositoryError::database(format!("Failed to find category by name: {}", e))
        })?;
        Ok(category)
    }

    async fn find_all(&self, only_active: bool) -> RepositoryResult<Vec<MenuCategory>> {
        let filter = if only_active {
            Some(doc! { "is_active": true })
        } else {
            None
        };
        let options = FindOptions::builder()
            .sort(doc! { "order": 1, "name": 1 })
            .build();
        let mut cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list categories: {}", e)))?;
        let mut categories = Vec::new();
        while let Some(category) = cursor.next().await {
            categories.push(category.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize category: {}", e))
            })?);
        }
        Ok(categories)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let count = self
            .collection
            .count_documents(None, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count categories: {}", e)))?;
        Ok(count)
    }

    async fn max_order(&self) -> RepositoryResult<i32> {
        let options = FindOptions::builder()
            .sort(doc! { "order": -1 })
            .limit(1)
            .build();
        let mut cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to read category order: {}", e)))?;
        match cursor.next().await {
            Some(Ok(category)) => Ok(category.order),
            Some(Err(e)) => Err(RepositoryError::serialization(format!(
                "Failed to deserialize category: {}",
                e
            ))),
            None => Ok(0),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id, order = order))]
    async fn set_order(&self, id: &ObjectId, order: i32) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        let update = doc! { "$set": {
            "order": order,
            "updated_at": chrono::Local::now().to_rfc3339(),
        } };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No category found to reorder for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to reorder category: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }
}
