use crate::model::menu::MenuItem;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 0.01, max = 100000.0))]
    pub price: f64,

    #[validate(url)]
    pub image_url: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,

    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 0.01, max = 100000.0))]
    pub price: Option<f64>,

    #[validate(url)]
    pub image_url: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,

    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub available: Option<bool>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_available: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        MenuItemResponse {
            id: item.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: item.title,
            description: item.description,
            price: item.price,
            image_url: item.image_url,
            category: item.category,
            is_available: item.is_available,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuListResponse {
    pub items: Vec<MenuItemResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_must_be_positive() {
        let request = CreateMenuItemRequest {
            title: "Paneer Tikka".to_string(),
            description: None,
            price: 0.0,
            image_url: None,
            category: Some("Appetizers (Veg)".to_string()),
            is_available: Some(true),
        };
        assert!(request.validate().is_err());
    }
}
