use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use cloudkitchen_backend::util::error::{HandlerError, HandlerErrorKind, ServiceError};

async fn call(err: HandlerError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_status_codes_follow_the_kind() {
    let cases = vec![
        (HandlerError::not_found("no such order"), StatusCode::NOT_FOUND),
        (HandlerError::bad_request("bad id"), StatusCode::BAD_REQUEST),
        (
            HandlerError::validation("Validation error: email"),
            StatusCode::BAD_REQUEST,
        ),
        (
            HandlerError::unauthorized("Missing Authorization header"),
            StatusCode::UNAUTHORIZED,
        ),
        (
            HandlerError::forbidden("Staff access required"),
            StatusCode::FORBIDDEN,
        ),
        (
            HandlerError::new(HandlerErrorKind::Conflict, "Email already registered"),
            StatusCode::CONFLICT,
        ),
        (
            HandlerError::new(HandlerErrorKind::PayloadTooLarge, "Request body too large"),
            StatusCode::PAYLOAD_TOO_LARGE,
        ),
        (
            HandlerError::new(HandlerErrorKind::RateLimited, "Please wait"),
            StatusCode::TOO_MANY_REQUESTS,
        ),
        (
            HandlerError::internal("Something went wrong"),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        let (status, _) = call(err).await;
        assert_eq!(status, expected);
    }
}

#[tokio::test]
async fn test_body_carries_error_and_message() {
    let (_, body) = call(HandlerError::not_found("Order not found")).await;
    assert_eq!(body["error"], "NotFound");
    assert_eq!(body["message"], "Order not found");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_internal_service_error_is_masked_in_body() {
    let err: HandlerError =
        ServiceError::InternalError("pool timed out after 30s".to_string()).into();
    let (status, body) = call(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Something went wrong");
    assert!(!body["message"].as_str().unwrap().contains("pool"));
}
