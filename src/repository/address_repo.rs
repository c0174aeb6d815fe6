use crate::model::address::Address;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Database;
use tracing::{error, info};

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn insert(&self, address: Address) -> RepositoryResult<Address>;
    async fn update(&self, id: ObjectId, address: Address) -> RepositoryResult<Address>;
    async fn delete(&self, id: ObjectId, user_id: ObjectId) -> RepositoryResult<()>;
    async fn find_for_user(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<Option<Address>>;
    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Address>>;
    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64>;
    /// Clears the default flag on every address of the user except `keep`.
    async fn clear_default_except(&self, user_id: &ObjectId, keep: &ObjectId) -> RepositoryResult<()>;
    async fn set_default(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<()>;
    async fn find_default(&self, user_id: &ObjectId) -> RepositoryResult<Option<Address>>;
    async fn find_most_recent(&self, user_id: &ObjectId) -> RepositoryResult<Option<Address>>;
}

pub struct MongoAddressRepository {
    collection: mongodb::Collection<Address>,
}

impl MongoAddressRepository {
    pub fn new(db: &Database) -> Self {
        MongoAddressRepository {
            collection: db.collection::<Address>("addresses"),
        }
    }
}

#[async_trait]
impl AddressRepository for MongoAddressRepository {
    #[tracing::instrument(skip(self, address), fields(user = %address.user))]
    async fn insert(&self, mut address: Address) -> RepositoryResult<Address> {
        address.id = Some(ObjectId::new());
        let now = chrono::Local::now().to_rfc3339();
        address.created_at = Some(now.clone());
        address.updated_at = Some(now);
        match self.collection.insert_one(address.clone(), None).await {
            Ok(_) => {
                info!("Address created");
                Ok(address)
            }
            Err(e) => {
                error!("Failed to insert address: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, address), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut address: Address) -> RepositoryResult<Address> {
        address.updated_at = Some(chrono::Local::now().to_rfc3339());
        let filter = doc! { "_id": id, "user": address.user };
        let mut doc = bson::to_document(&address).map_err(|e| {
            RepositoryError::serialization(format!("Failed to serialize address: {}", e))
        })?;
        doc.remove("_id");
        let update = doc! { "$set": doc };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(address),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No address found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update address: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId, user_id: ObjectId) -> RepositoryResult<()> {
        let filter = doc! { "_id": id, "user": user_id };
        match self.collection.delete_one(filter, None).await {
            Ok(result) if result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No address found to delete for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to delete address: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_for_user(
        &self,
        id: &ObjectId,
        user_id: &ObjectId,
    ) -> RepositoryResult<Option<Address>> {
        let filter = doc! { "_id": id, "user": user_id };
        let address = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find address: {}", e)))?;
        Ok(address)
    }

    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Address>> {
        let filter = doc! { "user": user_id };
        let options = FindOptions::builder()
            .sort(doc! { "is_default": -1, "updated_at": -1, "created_at": -1 })
            .build();
        let mut cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list addresses: {}", e)))?;
        let mut addresses = Vec::new();
        while let Some(address) = cursor.next().await {
            addresses.push(address.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize address: {}", e))
            })?);
        }
        Ok(addresses)
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        let filter = doc! { "user": user_id };
        let count = self
            .collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count addresses: {}", e)))?;
        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(user = %user_id, keep = %keep))]
    async fn clear_default_except(
        &self,
        user_id: &ObjectId,
        keep: &ObjectId,
    ) -> RepositoryResult<()> {
        let filter = doc! { "user": user_id, "_id": { "$ne": keep }, "is_default": true };
        let update = doc! { "$set": {
            "is_default": false,
            "updated_at": chrono::Local::now().to_rfc3339(),
        } };
        self.collection
            .update_many(filter, update, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to clear default flags: {}", e)))?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn set_default(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<()> {
        let filter = doc! { "_id": id, "user": user_id };
        let update = doc! { "$set": {
            "is_default": true,
            "updated_at": chrono::Local::now().to_rfc3339(),
        } };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No address found to promote for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to set default address: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_default(&self, user_id: &ObjectId) -> RepositoryResult<Option<Address>> {
        let filter = doc! { "user": user_id, "is_default": true };
        let address = self.collection.find_one(filter, None).await.map_err(|e| {
            RepositoryError::database(format!("Failed to find default address: {}", e))
        })?;
        Ok(address)
    }

    async fn find_most_recent(&self, user_id: &ObjectId) -> RepositoryResult<Option<Address>> {
        let filter = doc! { "user": user_id };
        let options = FindOptions::builder()
            .sort(doc! { "updated_at": -1, "created_at": -1 })
            .limit(1)
            .build();
        let mut cursor = self.collection.find(filter, options).await.map_err(|e| {
            RepositoryError::database(format!("Failed to find most recent address: {}", e))
        })?;
        match cursor.next().await {
            Some(Ok(address)) => Ok(Some(address)),
            Some(Err(e)) => Err(RepositoryError::serialization(format!(
                "Failed to deserialize address: {}",
                e
            ))),
            None => Ok(None),
        }
    }
}
