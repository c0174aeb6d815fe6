use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::dto::cart_dto::{AddCartItemRequest, UpdateCartItemRequest};
use crate::handler::{parse_object_id, validate_payload};
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::cart_service::{CartService, CartServiceImpl};
use crate::util::error::HandlerError;
use crate::util::json::AppJson;

pub async fn get_cart_handler(
    State(service): State<Arc<CartServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let cart = service.get(&current.user_id).await?;
    Ok(Json(cart))
}

pub async fn add_cart_item_handler(
    State(service): State<Arc<CartServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<AddCartItemRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let menu_item_id = parse_object_id(&payload.menu_item_id, "menu item")?;
    let cart = service
        .add_item(&current.user_id, &menu_item_id, payload.qty.unwrap_or(1.0))
        .await?;
    Ok(Json(cart))
}

pub async fn update_cart_item_handler(
    State(service): State<Arc<CartServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path((id,)): Path<(String,)>,
    AppJson(payload): AppJson<UpdateCartItemRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let menu_item_id = parse_object_id(&id, "menu item")?;
    let cart = service
        .set_qty(&current.user_id, &menu_item_id, payload.qty)
        .await?;
    Ok(Json(cart))
}

pub async fn remove_cart_item_handler(
    State(service): State<Arc<CartServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let menu_item_id = parse_object_id(&id, "menu item")?;
    let cart = service.remove_item(&current.user_id, &menu_item_id).await?;
    Ok(Json(cart))
}

pub async fn clear_cart_handler(
    State(service): State<Arc<CartServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let cart = service.clear(&current.user_id).await?;
    Ok(Json(cart))
}
