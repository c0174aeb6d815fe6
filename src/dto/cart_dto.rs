use serde::{Deserialize, Serialize};
use validator::Validate;

/// Quantity arrives as a float and is floored server-side, matching what
/// loose clients send; anything below 1 collapses to 1 on add.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCartItemRequest {
    #[validate(length(equal = 24))]
    pub menu_item_id: String,

    pub qty: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub qty: f64,
}

/// One cart line joined against the live menu item. `available` goes false
/// (and price stays current) when the item was edited after being added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineResponse {
    pub menu_item_id: String,
    pub title: String,
    pub price: f64,
    pub qty: u32,
    pub image_url: Option<String>,
    pub available: bool,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub subtotal: f64,
}
