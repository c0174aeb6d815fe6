use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::storage::ImageStorageService;

const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Accepts one image field, stores it under a random key and returns the
/// public URL for use as a menu item image.
pub async fn upload_image_handler(
    State(storage): State<Arc<ImageStorageService>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| HandlerError::bad_request(format!("Malformed multipart body: {}", e)))?
        .ok_or_else(|| HandlerError::bad_request("Missing image field"))?;

    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerError::bad_request("Missing image content type"))?;
    let extension = extension_for(&content_type).ok_or_else(|| {
        HandlerError::bad_request("Only PNG, JPEG and WEBP images are accepted")
    })?;

    let data = field
        .bytes()
        .await
        .map_err(|e| HandlerError::bad_request(format!("Failed to read image: {}", e)))?;
    if data.is_empty() {
        return Err(HandlerError::bad_request("Empty image upload"));
    }
    if data.len() > MAX_IMAGE_BYTES {
        return Err(HandlerError::new(
            HandlerErrorKind::PayloadTooLarge,
            "Image exceeds the 2 MB limit",
        ));
    }

    let object_name = format!("menu/{}.{}", Uuid::new_v4(), extension);
    storage
        .put_image(&object_name, data.to_vec(), &content_type)
        .await
        .map_err(|e| {
            tracing::error!("Image upload failed: {}", e);
            HandlerError::internal("Image upload failed")
        })?;

    let url = storage.public_url(&object_name);
    info!(object = %object_name, "Image uploaded");
    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}
