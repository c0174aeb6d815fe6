use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use validator::Validate;

use crate::dto::order_dto::{CheckoutRequest, OrderListQuery};
use crate::handler::{parse_object_id, validate_payload};
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::order_service::{OrderService, OrderServiceImpl};
use crate::util::error::HandlerError;
use crate::util::json::AppJson;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 2, max = 20))]
    pub status: String,
}

pub async fn checkout_handler(
    State(service): State<Arc<OrderServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<CheckoutRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let order = service.checkout(&current.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders_handler(
    State(service): State<Arc<OrderServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let orders = service
        .list(&current.user_id, current.role.is_staff(), query)
        .await?;
    Ok(Json(orders))
}

pub async fn get_order_handler(
    State(service): State<Arc<OrderServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let order_id = parse_object_id(&id, "order")?;
    let order = service
        .get(&current.user_id, current.role.is_staff(), &order_id)
        .await?;
    Ok(Json(order))
}

pub async fn cancel_order_handler(
    State(service): State<Arc<OrderServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let order_id = parse_object_id(&id, "order")?;
    let order = service
        .cancel(&current.user_id, current.role.is_staff(), &order_id)
        .await?;
    Ok(Json(order))
}

// Staff only
pub async fn update_order_status_handler(
    State(service): State<Arc<OrderServiceImpl>>,
    Path((id,)): Path<(String,)>,
    AppJson(payload): AppJson<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let order_id = parse_object_id(&id, "order")?;
    let order = service.update_status(&order_id, &payload.status).await?;
    Ok(Json(order))
}
