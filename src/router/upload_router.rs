use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, routing::post, Router};

use crate::handler::upload_handler::upload_image_handler;
use crate::middlewares::auth_middleware::{authenticate, AuthState};
use crate::util::storage::ImageStorageService;

pub fn upload_router(storage: Arc<ImageStorageService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/uploads/images", post(upload_image_handler))
        // 2 MB image plus multipart framing
        .layer(DefaultBodyLimit::max(3 * 1024 * 1024))
        .route_layer(middleware::from_fn_with_state(auth_state, authenticate))
        .with_state(storage)
}
