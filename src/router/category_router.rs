use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handler::category_handler::{
    create_category_handler, delete_category_handler, get_category_handler,
    list_all_categories_handler, list_categories_handler, reorder_categories_handler,
    update_category_handler,
};
use crate::middlewares::auth_middleware::{authenticate, require_staff, AuthState};
use crate::service::category_service::CategoryServiceImpl;

pub fn category_router(service: Arc<CategoryServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/categories", get(list_categories_handler))
        .route("/categories/{id}", get(get_category_handler));

    let staff = Router::new()
        .route("/categories", post(create_category_handler))
        .route("/categories/all", get(list_all_categories_handler))
        .route("/categories/reorder", put(reorder_categories_handler))
        .route(
            "/categories/{id}",
            axum::routing::patch(update_category_handler).delete(delete_category_handler),
        )
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(auth_state, authenticate));

    public.merge(staff).with_state(service)
}
