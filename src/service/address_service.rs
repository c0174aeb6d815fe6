use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::address_dto::{AddressResponse, CreateAddressRequest, UpdateAddressRequest};
use crate::model::address::Address;
use crate::repository::address_repo::AddressRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait AddressService: Send + Sync {
    async fn create(
        &self,
        user_id: &ObjectId,
        request: CreateAddressRequest,
    ) -> Result<AddressResponse, ServiceError>;
    async fn update(
        &self,
        user_id: &ObjectId,
        address_id: &ObjectId,
        request: UpdateAddressRequest,
    ) -> Result<AddressResponse, ServiceError>;
    async fn delete(&self, user_id: &ObjectId, address_id: &ObjectId) -> Result<(), ServiceError>;
    async fn get(&self, user_id: &ObjectId, address_id: &ObjectId) -> Result<AddressResponse, ServiceError>;
    async fn get_default(&self, user_id: &ObjectId) -> Result<AddressResponse, ServiceError>;
    async fn list(&self, user_id: &ObjectId) -> Result<Vec<AddressResponse>, ServiceError>;
    async fn set_default(
        &self,
        user_id: &ObjectId,
        address_id: &ObjectId,
    ) -> Result<AddressResponse, ServiceError>;
}

pub struct AddressServiceImpl {
    pub address_repo: Arc<dyn AddressRepository>,
}

impl AddressServiceImpl {
    pub fn new(address_repo: Arc<dyn AddressRepository>) -> Self {
        Self { address_repo }
    }
}

/// Builds the stored address from a create request. The default flag is
/// decided by the service, not the request.
fn address_from_request(user_id: ObjectId, request: CreateAddressRequest, is_default: bool) -> Address {
    Address {
        id: None,
        user: user_id,
        label: request.label.unwrap_or_else(|| "Home".to_string()),
        full_name: request.full_name,
        phone: request.phone,
        line1: request.line1,
        line2: request.line2,
        city: request.city,
        state: request.state,
        postal_code: request.postal_code,
        is_default,
        created_at: None,
        updated_at: None,
    }
}

#[async_trait]
impl AddressService for AddressServiceImpl {
    #[instrument(skip(self, request), fields(user = %user_id))]
    async fn create(
        &self,
        user_id: &ObjectId,
        request: CreateAddressRequest,
    ) -> Result<AddressResponse, ServiceError> {
        // The first address is always the default, whatever the request says.
        let existing = self.address_repo.count_for_user(user_id).await?;
        let wants_default = request.is_default.unwrap_or(false);
        let is_default = existing == 0 || wants_default;

        let address = address_from_request(*user_id, request, is_default);
        let inserted = self.address_repo.insert(address).await?;

        if is_default && existing > 0 {
            let id = inserted
                .id
                .ok_or_else(|| ServiceError::InternalError("Address without id".to_string()))?;
            self.address_repo.clear_default_except(user_id, &id).await?;
        }

        info!("Address created");
        Ok(AddressResponse::from(inserted))
    }

    #[instrument(skip(self, request), fields(user = %user_id, address = %address_id))]
    async fn update(
        &self,
        user_id: &ObjectId,
        address_id: &ObjectId,
        request: UpdateAddressRequest,
    ) -> Result<AddressResponse, ServiceError> {
        let mut address = self
            .address_repo
            .find_for_user(address_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Address not found".to_string()))?;

        if let Some(label) = request.label {
            address.label = label;
        }
        if let Some(full_name) = request.full_name {
            address.full_name = full_name;
        }
        if let Some(phone) = request.phone {
            address.phone = phone;
        }
        if let Some(line1) = request.line1 {
            address.line1 = line1;
        }
        if let Some(line2) = request.line2 {
            address.line2 = Some(line2);
        }
        if let Some(city) = request.city {
            address.city = city;
        }
        if let Some(state) = request.state {
            address.state = state;
        }
        if let Some(postal_code) = request.postal_code {
            address.postal_code = postal_code;
        }

        let becoming_default = match request.is_default {
            Some(true) => !address.is_default,
            Some(false) if address.is_default => {
                // The default flag moves by promoting another address.
                return Err(ServiceError::InvalidInput(
                    "Set another address as default instead of unsetting this one".to_string(),
                ));
            }
            _ => false,
        };
        if becoming_default {
            address.is_default = true;
        }

        let updated = self.address_repo.update(*address_id, address).await?;
        if becoming_default {
            self.address_repo
                .clear_default_except(user_id, address_id)
                .await?;
        }

        Ok(AddressResponse::from(updated))
    }

    #[instrument(skip(self), fields(user = %user_id, address = %address_id))]
    async fn delete(&self, user_id: &ObjectId, address_id: &ObjectId) -> Result<(), ServiceError> {
        let address = self
            .address_repo
            .find_for_user(address_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Address not found".to_string()))?;
        let was_default = address.is_default;

        self.address_repo.delete(*address_id, *user_id).await?;

        // Deleting the default hands the flag to the most recent survivor.
        if was_default {
            if let Some(next) = self.address_repo.find_most_recent(user_id).await? {
                if let Some(next_id) = next.id {
                    self.address_repo.set_default(&next_id, user_id).await?;
                }
            }
        }

        info!("Address deleted");
        Ok(())
    }

    async fn get(
        &self,
        user_id: &ObjectId,
        address_id: &ObjectId,
    ) -> Result<AddressResponse, ServiceError> {
        let address = self
            .address_repo
            .find_for_user(address_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Address not found".to_string()))?;
        Ok(AddressResponse::from(address))
    }

    async fn get_default(&self, user_id: &ObjectId) -> Result<AddressResponse, ServiceError> {
        let address = self
            .address_repo
            .find_default(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No default address set".to_string()))?;
        Ok(AddressResponse::from(address))
    }

    async fn list(&self, user_id: &ObjectId) -> Result<Vec<AddressResponse>, ServiceError> {
        let addresses = self.address_repo.list_for_user(user_id).await?;
        Ok(addresses.into_iter().map(AddressResponse::from).collect())
    }

    #[instrument(skip(self), fields(user = %user_id, address = %address_id))]
    async fn set_default(
        &self,
        user_id: &ObjectId,
        address_id: &ObjectId,
    ) -> Result<AddressResponse, ServiceError> {
        let address = self
            .address_repo
            .find_for_user(address_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Address not found".to_string()))?;

        if !address.is_default {
            self.address_repo.set_default(address_id, user_id).await?;
            self.address_repo
                .clear_default_except(user_id, address_id)
                .await?;
        }

        let updated = self
            .address_repo
            .find_for_user(address_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Address not found".to_string()))?;
        Ok(AddressResponse::from(updated))
    }
}
