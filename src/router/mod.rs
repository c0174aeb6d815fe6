pub mod user_router;
pub mod address_router;
pub mod menu_router;
pub mod category_router;
pub mod cart_router;
pub mod order_router;
pub mod upload_router;
