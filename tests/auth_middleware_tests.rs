use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{middleware, routing::get, Extension, Router};
use tower::util::ServiceExt;

use cloudkitchen_backend::middlewares::auth_middleware::{
    authenticate, require_owner, require_staff, AuthState, CurrentUser,
};
use cloudkitchen_backend::model::user::Role;
use cloudkitchen_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
    user.email
}

fn auth_state() -> Arc<AuthState> {
    Arc::new(AuthState {
        jwt_utils: Arc::new(JwtTokenUtilsImpl::from_test_env()),
    })
}

fn authed_app(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

fn staff_app(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/staff", get(|| async { "staff" }))
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

fn owner_app(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/owner", get(|| async { "owner" }))
        .route_layer(middleware::from_fn(require_owner))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

fn token_for(state: &AuthState, role: Role) -> String {
    state
        .jwt_utils
        .generate_token("64f000000000000000000001", "asha@example.com", role)
        .unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let state = auth_state();
    let response = authed_app(state)
        .oneshot(get_request("/whoami", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let state = auth_state();
    let response = authed_app(state)
        .oneshot(get_request("/whoami", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let state = auth_state();
    let token = token_for(&state, Role::User);
    let response = authed_app(state)
        .oneshot(get_request("/whoami", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"asha@example.com");
}

#[tokio::test]
async fn test_customer_blocked_from_staff_route() {
    let state = auth_state();
    let token = token_for(&state, Role::User);
    let response = staff_app(state)
        .oneshot(get_request("/staff", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_passes_staff_gate() {
    let state = auth_state();
    let token = token_for(&state, Role::Admin);
    let response = staff_app(state)
        .oneshot(get_request("/staff", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_blocked_from_owner_route() {
    let state = auth_state();
    let token = token_for(&state, Role::Admin);
    let response = owner_app(state)
        .oneshot(get_request("/owner", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_owner_passes_owner_gate() {
    let state = auth_state();
    let token = token_for(&state, Role::Owner);
    let response = owner_app(state)
        .oneshot(get_request("/owner", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
