use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::dto::address_dto::{AddressListResponse, CreateAddressRequest, UpdateAddressRequest};
use crate::handler::{parse_object_id, validate_payload};
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::address_service::{AddressService, AddressServiceImpl};
use crate::util::error::HandlerError;
use crate::util::json::AppJson;

pub async fn create_address_handler(
    State(service): State<Arc<AddressServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<CreateAddressRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let address = service.create(&current.user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

pub async fn list_addresses_handler(
    State(service): State<Arc<AddressServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let addresses = service.list(&current.user_id).await?;
    Ok(Json(AddressListResponse { addresses }))
}

pub async fn get_default_address_handler(
    State(service): State<Arc<AddressServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let address = service.get_default(&current.user_id).await?;
    Ok(Json(address))
}

pub async fn get_address_handler(
    State(service): State<Arc<AddressServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let address_id = parse_object_id(&id, "address")?;
    let address = service.get(&current.user_id, &address_id).await?;
    Ok(Json(address))
}

pub async fn update_address_handler(
    State(service): State<Arc<AddressServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path((id,)): Path<(String,)>,
    AppJson(payload): AppJson<UpdateAddressRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let address_id = parse_object_id(&id, "address")?;
    let address = service.update(&current.user_id, &address_id, payload).await?;
    Ok(Json(address))
}

pub async fn delete_address_handler(
    State(service): State<Arc<AddressServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let address_id = parse_object_id(&id, "address")?;
    service.delete(&current.user_id, &address_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_default_address_handler(
    State(service): State<Arc<AddressServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let address_id = parse_object_id(&id, "address")?;
    let address = service.set_default(&current.user_id, &address_id).await?;
    Ok(Json(address))
}
