pub mod repository_error;
pub mod mongo;
pub mod user_repo;
pub mod address_repo;
pub mod menu_repo;
pub mod category_repo;
pub mod cart_repo;
pub mod order_repo;
