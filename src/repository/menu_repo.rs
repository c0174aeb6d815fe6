use crate::model::menu::MenuItem;
use crate::repository::mongo::regex_escape;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Database;
use tracing::{error, info};

/// Catalog list filter. Empty fields place no constraint.
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub category: Option<String>,
    pub available: Option<bool>,
    pub q: Option<String>,
}

impl MenuFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(ref category) = self.category {
            filter.insert("category", category);
        }
        if let Some(available) = self.available {
            filter.insert("is_available", available);
        }
        if let Some(ref q) = self.q {
            let pattern = regex_escape(q);
            filter.insert("title", doc! { "$regex": pattern, "$options": "i" });
        }
        filter
    }
}

#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn insert(&self, item: MenuItem) -> RepositoryResult<MenuItem>;
    async fn update(&self, id: ObjectId, item: MenuItem) -> RepositoryResult<MenuItem>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<MenuItem>>;
    async fn find_many(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<MenuItem>>;
    async fn list(&self, filter: &MenuFilter, page: u32, limit: u32) -> RepositoryResult<Vec<MenuItem>>;
    async fn count(&self, filter: &MenuFilter) -> RepositoryResult<u64>;
}

pub struct MongoMenuRepository {
    collection: mongodb::Collection<MenuItem>,
}

impl MongoMenuRepository {
    pub fn new(db: &Database) -> Self {
        MongoMenuRepository {
            collection: db.collection::<MenuItem>("menuitems"),
        }
    }
}

#[async_trait]
impl MenuRepository for MongoMenuRepository {
    #[tracing::instrument(skip(self, item), fields(title = %item.title))]
    async fn insert(&self, mut item: MenuItem) -> RepositoryResult<MenuItem> {
        item.id = Some(ObjectId::new());
        let now = chrono::Local::now().to_rfc3339();
        item.created_at = Some(now.clone());
        item.updated_at = Some(now);
        match self.collection.insert_one(item.clone(), None).await {
            Ok(_) => {
                info!("Menu item created");
                Ok(item)
            }
            Err(e) => {
                error!("Failed to insert menu item: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, item), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut item: MenuItem) -> RepositoryResult<MenuItem> {
        item.updated_at = Some(chrono::Local::now().to_rfc3339());
        let filter = doc! { "_id": id };
        let mut doc = bson::to_document(&item).map_err(|e| {
            RepositoryError::serialization(format!("Failed to serialize menu item: {}", e))
        })?;
        doc.remove("_id");
        let update = doc! { "$set": doc };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(item),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No menu item found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update menu item: {}", e);
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
                "No menu item found to delete for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to delete menu item: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<MenuItem>> {
        let filter = doc! { "_id": id };
        let item = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find menu item: {}", e)))?;
        Ok(item)
    }

    async fn find_many(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<MenuItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = doc! { "_id": { "$in": ids.to_vec() } };
        let mut cursor = self
            .collection
            .find(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to fetch menu items: {}", e)))?;
        let mut items = Vec::new();
        while let Some(item) = cursor.next().await {
            items.push(item.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize menu item: {}", e))
            })?);
        }
        Ok(items)
    }

    #[tracing::instrument(skip(self, filter), fields(page = page, limit = limit))]
    async fn list(
        &self,
        filter: &MenuFilter,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<MenuItem>> {
        let skip = (page.saturating_sub(1) as u64) * limit as u64;
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit as i64)
            .build();
        let mut cursor = self
            .collection
            .find(filter.to_document(), options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list menu items: {}", e)))?;
        let mut items = Vec::new();
        while let Some(item) = cursor.next().await {
            items.push(item.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize menu item: {}", e))
            })?);
        }
        Ok(items)
    }

    async fn count(&self, filter: &MenuFilter) -> RepositoryResult<u64> {
        let count = self
            .collection
            .count_documents(filter.to_document(), None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count menu items: {}", e)))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_is_empty_document() {
        assert!(MenuFilter::default().to_document().is_empty());
    }

    #[test]
    fn test_filter_builds_expected_clauses() {
        let filter = MenuFilter {
            category: Some("Desserts".to_string()),
            available: Some(true),
            q: Some("pan.eer".to_string()),
        };
        let doc = filter.to_document();
        assert_eq!(doc.get_str("category").unwrap(), "Desserts");
        assert!(doc.get_bool("is_available").unwrap());
        let title = doc.get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), "pan\\.eer");
    }
}
