pub mod user;
pub mod address;
pub mod menu;
pub mod category;
pub mod cart;
pub mod order;
