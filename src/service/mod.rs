pub mod user_service;
pub mod address_service;
pub mod menu_service;
pub mod category_service;
pub mod cart_service;
pub mod order_service;
