use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::dto::menu_dto::{CreateMenuItemRequest, MenuListQuery, UpdateMenuItemRequest};
use crate::handler::{parse_object_id, validate_payload};
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::menu_service::{MenuService, MenuServiceImpl};
use crate::util::error::HandlerError;
use crate::util::json::AppJson;

pub async fn list_menu_handler(
    State(service): State<Arc<MenuServiceImpl>>,
    Query(query): Query<MenuListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let items = service.list(query).await?;
    Ok(Json(items))
}

pub async fn get_menu_item_handler(
    State(service): State<Arc<MenuServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let item_id = parse_object_id(&id, "menu item")?;
    let item = service.get(&item_id).await?;
    Ok(Json(item))
}

// Staff only
pub async fn create_menu_item_handler(
    State(service): State<Arc<MenuServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<CreateMenuItemRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let item = service.create(&current.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

// Staff only
pub async fn update_menu_item_handler(
    State(service): State<Arc<MenuServiceImpl>>,
    Path((id,)): Path<(String,)>,
    AppJson(payload): AppJson<UpdateMenuItemRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let item_id = parse_object_id(&id, "menu item")?;
    let item = service.update(&item_id, payload).await?;
    Ok(Json(item))
}

// Staff only
pub async fn delete_menu_item_handler(
    State(service): State<Arc<MenuServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let item_id = parse_object_id(&id, "menu item")?;
    service.delete(&item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
