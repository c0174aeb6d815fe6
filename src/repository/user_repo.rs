use crate::model::user::{Role, RoleChangeLog, User};
use crate::repository::mongo::regex_escape;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Database;
use tracing::{error, info};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn update(&self, id: ObjectId, user: User) -> RepositoryResult<User>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    /// Looks up a user by the exact (first name, last name, mobile) triple.
    async fn find_by_profile(
        &self,
        first_name: &str,
        last_name: &str,
        mobile_number: &str,
    ) -> RepositoryResult<Option<User>>;
    async fn find_by_verification_token(&self, token: &str) -> RepositoryResult<Option<User>>;
    async fn count_by_role(&self, role: Role) -> RepositoryResult<u64>;
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<User>>;
    async fn search(&self, query: &str, limit: u32) -> RepositoryResult<Vec<User>>;
    async fn count(&self) -> RepositoryResult<u64>;
    async fn insert_role_change(&self, log: RoleChangeLog) -> RepositoryResult<()>;
}

pub struct MongoUserRepository {
    collection: mongodb::Collection<User>,
    role_changes: mongodb::Collection<RoleChangeLog>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        MongoUserRepository {
            collection: db.collection::<User>("users"),
            role_changes: db.collection::<RoleChangeLog>("role_change_logs"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        let now = chrono::Local::now().to_rfc3339();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        match self.collection.insert_one(user.clone(), None).await {
            Ok(_) => {
                info!("User created");
                Ok(user)
            }
            Err(e) => {
                error!("Failed to insert user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, user), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut user: User) -> RepositoryResult<User> {
        user.updated_at = Some(chrono::Local::now().to_rfc3339());
        let filter = doc! { "_id": id };
        let mut doc = bson::to_document(&user)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize user: {}", e)))?;
        doc.remove("_id");
        let update = doc! { "$set": doc };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(user),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No user found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        let filter = doc! { "_id": id };
        let user = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by id: {}", e)))?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "email": email };
        let user = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by email: {}", e)))?;
        Ok(user)
    }

    async fn find_by_profile(
        &self,
        first_name: &str,
        last_name: &str,
        mobile_number: &str,
    ) -> RepositoryResult<Option<User>> {
        let filter = doc! {
            "first_name": first_name,
            "last_name": last_name,
            "mobile_number": mobile_number,
        };
        let user = self.collection.find_one(filter, None).await.map_err(|e| {
            RepositoryError::database(format!("Failed to find user by profile: {}", e))
        })?;
        Ok(user)
    }

    async fn find_by_verification_token(&self, token: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "verification_token": token };
        let user = self.collection.find_one(filter, None).await.map_err(|e| {
            RepositoryError::database(format!("Failed to find user by verification token: {}", e))
        })?;
        Ok(user)
    }

    async fn count_by_role(&self, role: Role) -> RepositoryResult<u64> {
        let filter = doc! { "role": role.as_str() };
        let count = self
            .collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count users by role: {}", e)))?;
        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<User>> {
        let skip = (page.saturating_sub(1) as u64) * limit as u64;
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit as i64)
            .build();
        let mut cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list users: {}", e)))?;
        let mut users = Vec::new();
        while let Some(user) = cursor.next().await {
            users.push(user.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize user: {}", e))
            })?);
        }
        Ok(users)
    }

    #[tracing::instrument(skip(self), fields(query = %query))]
    async fn search(&self, query: &str, limit: u32) -> RepositoryResult<Vec<User>> {
        let pattern = format!("^{}", regex_escape(query));
        let filter = doc! {
            "$or": [
                { "email": { "$regex": &pattern, "$options": "i" } },
                { "first_name": { "$regex": &pattern, "$options": "i" } },
                { "last_name": { "$regex": &pattern, "$options": "i" } },
                { "mobile_number": { "$regex": &pattern, "$options": "i" } },
            ]
        };
        let options = FindOptions::builder()
            .sort(doc! { "email": 1 })
            .limit(limit as i64)
            .build();
        let mut cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to search users: {}", e)))?;
        let mut users = Vec::new();
        while let Some(user) = cursor.next().await {
            users.push(user.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize user: {}", e))
            })?);
        }
        Ok(users)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let count = self
            .collection
            .count_documents(None, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count users: {}", e)))?;
        Ok(count)
    }

    #[tracing::instrument(skip(self, log), fields(user = %log.user))]
    async fn insert_role_change(&self, mut log: RoleChangeLog) -> RepositoryResult<()> {
        log.id = Some(ObjectId::new());
        log.created_at = Some(chrono::Local::now().to_rfc3339());
        self.role_changes
            .insert_one(log, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to record role change: {}", e)))?;
        Ok(())
    }
}
