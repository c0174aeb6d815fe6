use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::dto::category_dto::{
    CategoryListResponse, CreateCategoryRequest, ReorderCategoriesRequest, UpdateCategoryRequest,
};
use crate::handler::{parse_object_id, validate_payload};
use crate::service::category_service::{CategoryService, CategoryServiceImpl};
use crate::util::error::HandlerError;
use crate::util::json::AppJson;

pub async fn list_categories_handler(
    State(service): State<Arc<CategoryServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let categories = service.list(false).await?;
    Ok(Json(CategoryListResponse { categories }))
}

// Staff only: includes inactive categories
pub async fn list_all_categories_handler(
    State(service): State<Arc<CategoryServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let categories = service.list(true).await?;
    Ok(Json(CategoryListResponse { categories }))
}

pub async fn get_category_handler(
    State(service): State<Arc<CategoryServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let category_id = parse_object_id(&id, "category")?;
    let category = service.get(&category_id).await?;
    Ok(Json(category))
}

// Staff only
pub async fn create_category_handler(
    State(service): State<Arc<CategoryServiceImpl>>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let category = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

// Staff only
pub async fn update_category_handler(
    State(service): State<Arc<CategoryServiceImpl>>,
    Path((id,)): Path<(String,)>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let category_id = parse_object_id(&id, "category")?;
    let category = service.update(&category_id, payload).await?;
    Ok(Json(category))
}

// Staff only
pub async fn delete_category_handler(
    State(service): State<Arc<CategoryServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let category_id = parse_object_id(&id, "category")?;
    service.delete(&category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Staff only
pub async fn reorder_categories_handler(
    State(service): State<Arc<CategoryServiceImpl>>,
    AppJson(payload): AppJson<ReorderCategoriesRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let categories = service.reorder(payload).await?;
    Ok(Json(CategoryListResponse { categories }))
}
