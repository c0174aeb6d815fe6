use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handler::order_handler::{
    cancel_order_handler, checkout_handler, get_order_handler, list_orders_handler,
    update_order_status_handler,
};
use crate::middlewares::auth_middleware::{authenticate, require_staff, AuthState};
use crate::service::order_service::OrderServiceImpl;

pub fn order_router(service: Arc<OrderServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    let authed = Router::new()
        .route("/orders", get(list_orders_handler))
        .route("/orders/checkout", post(checkout_handler))
        .route("/orders/{id}", get(get_order_handler))
        .route("/orders/{id}/cancel", post(cancel_order_handler))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            authenticate,
        ));

    let staff = Router::new()
        .route("/orders/{id}/status", put(update_order_status_handler))
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(auth_state, authenticate));

    authed.merge(staff).with_state(service)
}
