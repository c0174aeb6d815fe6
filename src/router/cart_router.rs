use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::handler::cart_handler::{
    add_cart_item_handler, clear_cart_handler, get_cart_handler, remove_cart_item_handler,
    update_cart_item_handler,
};
use crate::middlewares::auth_middleware::{authenticate, AuthState};
use crate::service::cart_service::CartServiceImpl;

pub fn cart_router(service: Arc<CartServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route(
            "/cart",
            get(get_cart_handler).delete(clear_cart_handler),
        )
        .route("/cart/items", post(add_cart_item_handler))
        .route(
            "/cart/items/{id}",
            delete(remove_cart_item_handler).patch(update_cart_item_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, authenticate))
        .with_state(service)
}
