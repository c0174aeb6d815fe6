use crate::model::order::{Order, OrderStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Database;
use tracing::{error, info};

/// Order list filter. A customer list always pins `user`; staff may leave
/// it open and filter by status or creation-time range instead. Range bounds
/// are RFC3339 strings, matching how `created_at` is stored.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub user: Option<ObjectId>,
    pub status: Option<OrderStatus>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
}

impl OrderFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(user) = self.user {
            filter.insert("user", user);
        }
        if let Some(status) = self.status {
            filter.insert("status", status.as_str());
        }
        let mut created = Document::new();
        if let Some(ref from) = self.created_from {
            created.insert("$gte", from);
        }
        if let Some(ref to) = self.created_to {
            created.insert("$lte", to);
        }
        if !created.is_empty() {
            filter.insert("created_at", created);
        }
        filter
    }
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: Order) -> RepositoryResult<Order>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Order>>;
    async fn list(&self, filter: &OrderFilter, page: u32, limit: u32) -> RepositoryResult<Vec<Order>>;
    async fn count(&self, filter: &OrderFilter) -> RepositoryResult<u64>;
    async fn update_status(&self, id: &ObjectId, status: OrderStatus) -> RepositoryResult<()>;
}

pub struct MongoOrderRepository {
    collection: mongodb::Collection<Order>,
}

impl MongoOrderRepository {
    pub fn new(db: &Database) -> Self {
        MongoOrderRepository {
            collection: db.collection::<Order>("orders"),
        }
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[tracing::instrument(skip(self, order), fields(user = %order.user))]
    async fn insert(&self, mut order: Order) -> RepositoryResult<Order> {
        order.id = Some(ObjectId::new());
        let now = chrono::Local::now().to_rfc3339();
        order.created_at = Some(now.clone());
        order.updated_at = Some(now);
        match self.collection.insert_one(order.clone(), None).await {
            Ok(_) => {
                info!("Order created");
                Ok(order)
            }
            Err(e) => {
                error!("Failed to insert order: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Order>> {
        let filter = doc! { "_id": id };
        let order = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find order: {}", e)))?;
        Ok(order)
    }

    #[tracing::instrument(skip(self, filter), fields(page = page, limit = limit))]
    async fn list(
        &self,
        filter: &OrderFilter,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Order>> {
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
            .map_err(|e| RepositoryError::database(format!("Failed to list orders: {}", e)))?;
        let mut orders = Vec::new();
        while let Some(order) = cursor.next().await {
            orders.push(order.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize order: {}", e))
            })?);
        }
        Ok(orders)
    }

    async fn count(&self, filter: &OrderFilter) -> RepositoryResult<u64> {
        let count = self
            .collection
            .count_documents(filter.to_document(), None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count orders: {}", e)))?;
        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(id = %id, status = %status.as_str()))]
    async fn update_status(&self, id: &ObjectId, status: OrderStatus) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        let update = doc! { "$set": {
            "status": status.as_str(),
            "updated_at": chrono::Local::now().to_rfc3339(),
        } };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No order found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update order status: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }
}
