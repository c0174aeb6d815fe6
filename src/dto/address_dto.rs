use crate::model::address::Address;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAddressRequest {
    #[validate(length(max = 50))]
    pub label: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub full_name: String,

    #[validate(length(min = 6, max = 20))]
    pub phone: String,

    #[validate(length(min = 2, max = 200))]
    pub line1: String,

    #[validate(length(max = 200))]
    pub line2: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 100))]
    pub state: String,

    #[validate(length(min = 3, max = 20))]
    pub postal_code: String,

    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAddressRequest {
    #[validate(length(max = 50))]
    pub label: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub full_name: Option<String>,

    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,

    #[validate(length(min = 2, max = 200))]
    pub line1: Option<String>,

    #[validate(length(max = 200))]
    pub line2: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub state: Option<String>,

    #[validate(length(min = 3, max = 20))]
    pub postal_code: Option<String>,

    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: String,
    pub label: String,
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub is_default: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        AddressResponse {
            id: address.id.map(|id| id.to_hex()).unwrap_or_default(),
            label: address.label,
            full_name: address.full_name,
            phone: address.phone,
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            is_default: address.is_default,
            created_at: address.created_at,
            updated_at: address.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressListResponse {
    pub addresses: Vec<AddressResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_address_requires_core_fields() {
        let request = CreateAddressRequest {
            label: None,
            full_name: "Asha Rao".to_string(),
            phone: "5550001111".to_string(),
            line1: "12 Elm Street".to_string(),
            line2: None,
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62704".to_string(),
            is_default: None,
        };
        assert!(request.validate().is_ok());

        let mut short_postal = request.clone();
        short_postal.postal_code = "1".to_string();
        assert!(short_postal.validate().is_err());
    }
}
