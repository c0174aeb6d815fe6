use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use crate::handler::address_handler::{
    create_address_handler, delete_address_handler, get_address_handler,
    get_default_address_handler, list_addresses_handler, set_default_address_handler,
    update_address_handler,
};
use crate::middlewares::auth_middleware::{authenticate, AuthState};
use crate::service::address_service::AddressServiceImpl;

pub fn address_router(service: Arc<AddressServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route(
            "/addresses",
            get(list_addresses_handler).post(create_address_handler),
        )
        .route("/addresses/default", get(get_default_address_handler))
        .route(
            "/addresses/{id}",
            get(get_address_handler)
                .put(update_address_handler)
                .delete(delete_address_handler),
        )
        .route(
            "/addresses/{id}/default",
            patch(set_default_address_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, authenticate))
        .with_state(service)
}
