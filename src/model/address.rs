use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Saved delivery address.
///
/// Invariant: a user with at least one address has exactly one with
/// `is_default = true`; maintenance lives in AddressService.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
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
