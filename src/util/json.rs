use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::util::error::{HandlerError, HandlerErrorKind};

/// JSON extractor producing the crate's error envelope on rejection.
///
/// Oversized bodies get a dedicated 413 PayloadTooLarge envelope; every
/// other rejection (bad syntax, wrong content type) maps to BadRequest.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(map_rejection(rejection)),
        }
    }
}

fn map_rejection(rejection: JsonRejection) -> HandlerError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HandlerError::new(HandlerErrorKind::PayloadTooLarge, "Request body too large")
    } else {
        HandlerError::bad_request(rejection.body_text())
    }
}
