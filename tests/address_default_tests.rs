use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bson::oid::ObjectId;
use tower::util::ServiceExt;

use cloudkitchen_backend::middlewares::auth_middleware::AuthState;
use cloudkitchen_backend::model::address::Address;
use cloudkitchen_backend::model::user::Role;
use cloudkitchen_backend::repository::address_repo::AddressRepository;
use cloudkitchen_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use cloudkitchen_backend::router::address_router::address_router;
use cloudkitchen_backend::service::address_service::{AddressService, AddressServiceImpl};
use cloudkitchen_backend::util::error::ServiceError;
use cloudkitchen_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

#[derive(Default)]
struct InMemoryAddresses {
    addresses: Mutex<Vec<Address>>,
}

#[async_trait]
impl AddressRepository for InMemoryAddresses {
    async fn insert(&self, mut address: Address) -> RepositoryResult<Address> {
        address.id = Some(ObjectId::new());
        self.addresses.lock().unwrap().push(address.clone());
        Ok(address)
    }

    async fn update(&self, id: ObjectId, address: Address) -> RepositoryResult<Address> {
        let mut addresses = self.addresses.lock().unwrap();
        match addresses.iter_mut().find(|a| a.id == Some(id)) {
            Some(slot) => {
                *slot = address.clone();
                Ok(address)
            }
            None => Err(RepositoryError::not_found("No such address")),
        }
    }

    async fn delete(&self, id: ObjectId, user_id: ObjectId) -> RepositoryResult<()> {
        self.addresses
            .lock()
            .unwrap()
            .retain(|a| !(a.id == Some(id) && a.user == user_id));
        Ok(())
    }

    async fn find_for_user(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<Option<Address>> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id.as_ref() == Some(id) && a.user == *user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Address>> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user == *user_id)
            .cloned()
            .collect())
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.list_for_user(user_id).await?.len() as u64)
    }

    async fn clear_default_except(&self, user_id: &ObjectId, keep: &ObjectId) -> RepositoryResult<()> {
        for address in self.addresses.lock().unwrap().iter_mut() {
            if address.user == *user_id && address.id.as_ref() != Some(keep) {
                address.is_default = false;
            }
        }
        Ok(())
    }

    async fn set_default(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<()> {
        for address in self.addresses.lock().unwrap().iter_mut() {
            if address.user == *user_id && address.id.as_ref() == Some(id) {
                address.is_default = true;
            }
        }
        Ok(())
    }

    async fn find_default(&self, user_id: &ObjectId) -> RepositoryResult<Option<Address>> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.user == *user_id && a.is_default)
            .cloned())
    }

    async fn find_most_recent(&self, user_id: &ObjectId) -> RepositoryResult<Option<Address>> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user == *user_id)
            .last()
            .cloned())
    }
}

fn sample_address(user: ObjectId, label: &str, is_default: bool) -> Address {
    Address {
        id: Some(ObjectId::new()),
        user,
        label: label.to_string(),
        full_name: "Asha Rao".to_string(),
        phone: "5550001111".to_string(),
        line1: "12 Elm Street".to_string(),
        line2: None,
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62704".to_string(),
        is_default,
        created_at: None,
        updated_at: None,
    }
}

#[tokio::test]
async fn test_get_default_returns_not_found_when_none() {
    let repo = Arc::new(InMemoryAddresses::default());
    let service = AddressServiceImpl::new(repo);
    let err = service.get_default(&ObjectId::new()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_get_default_returns_the_default_address() {
    let user = ObjectId::new();
    let repo = Arc::new(InMemoryAddresses::default());
    repo.addresses
        .lock()
        .unwrap()
        .extend([sample_address(user, "Work", false), sample_address(user, "Home", true)]);

    let service = AddressServiceImpl::new(repo);
    let address = service.get_default(&user).await.unwrap();
    assert_eq!(address.label, "Home");
    assert!(address.is_default);
}

// The static /addresses/default route must not fall into /addresses/{id}.
#[tokio::test]
async fn test_default_route_is_not_treated_as_an_id() {
    let jwt_utils = Arc::new(JwtTokenUtilsImpl::from_test_env());
    let auth_state = Arc::new(AuthState {
        jwt_utils: jwt_utils.clone(),
    });
    let service = Arc::new(AddressServiceImpl::new(Arc::new(InMemoryAddresses::default())));
    let app = address_router(service, auth_state);

    let user = ObjectId::new();
    let token = jwt_utils
        .generate_token(&user.to_hex(), "asha@example.com", Role::User)
        .unwrap();
    let request = Request::builder()
        .uri("/addresses/default")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    // No default saved: 404, not 400 from object-id parsing.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
