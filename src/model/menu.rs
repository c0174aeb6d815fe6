use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Menu catalog item. `category` is a plain label, not an enforced foreign
/// key; categories and items are lifecycled independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_available: bool,
    pub created_by: Option<ObjectId>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
