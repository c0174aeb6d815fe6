use crate::model::cart::{Cart, CartItem};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::Database;
use tracing::{error, info};

#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Option<Cart>>;
    /// Creates (and returns) an empty cart for the user.
    async fn create_empty(&self, user_id: ObjectId) -> RepositoryResult<Cart>;
    /// Replaces the cart's item lines wholesale.
    async fn set_items(&self, user_id: &ObjectId, items: &[CartItem]) -> RepositoryResult<()>;
}

pub struct MongoCartRepository {
    collection: mongodb::Collection<Cart>,
}

impl MongoCartRepository {
    pub fn new(db: &Database) -> Self {
        MongoCartRepository {
            collection: db.collection::<Cart>("carts"),
        }
    }
}

#[async_trait]
impl CartRepository for MongoCartRepository {
    async fn find_by_user(&self, user_id: &ObjectId) -> RepositoryResult<Option<Cart>> {
        let filter = doc! { "user": user_id };
        let cart = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find cart: {}", e)))?;
        Ok(cart)
    }

    #[tracing::instrument(skip(self), fields(user = %user_id))]
    async fn create_empty(&self, user_id: ObjectId) -> RepositoryResult<Cart> {
        let now = chrono::Local::now().to_rfc3339();
        let cart = Cart {
            id: Some(ObjectId::new()),
            user: user_id,
            items: Vec::new(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        match self.collection.insert_one(cart.clone(), None).await {
            Ok(_) => {
                info!("Cart created");
                Ok(cart)
            }
            Err(e) => {
                error!("Failed to create cart: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, items), fields(user = %user_id, lines = items.len()))]
    async fn set_items(&self, user_id: &ObjectId, items: &[CartItem]) -> RepositoryResult<()> {
        let items_bson = bson::to_bson(items)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize cart: {}", e)))?;
        let filter = doc! { "user": user_id };
        let update = doc! { "$set": {
            "items": items_bson,
            "updated_at": chrono::Local::now().to_rfc3339(),
        } };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No cart found for user: {}",
                user_id
            ))),
            Err(e) => {
                error!("Failed to update cart: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }
}
