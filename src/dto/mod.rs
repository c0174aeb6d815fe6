pub mod user_dto;
pub mod address_dto;
pub mod menu_dto;
pub mod category_dto;
pub mod cart_dto;
pub mod order_dto;
