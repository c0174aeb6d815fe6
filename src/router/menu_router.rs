use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handler::menu_handler::{
    create_menu_item_handler, delete_menu_item_handler, get_menu_item_handler, list_menu_handler,
    update_menu_item_handler,
};
use crate::middlewares::auth_middleware::{authenticate, require_staff, AuthState};
use crate::service::menu_service::MenuServiceImpl;

pub fn menu_router(service: Arc<MenuServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Browsing the catalog needs no account
    let public = Router::new()
        .route("/menu", get(list_menu_handler))
        .route("/menu/{id}", get(get_menu_item_handler));

    let staff = Router::new()
        .route("/menu", post(create_menu_item_handler))
        .route(
            "/menu/{id}",
            axum::routing::patch(update_menu_item_handler).delete(delete_menu_item_handler),
        )
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(auth_state, authenticate));

    public.merge(staff).with_state(service)
}
