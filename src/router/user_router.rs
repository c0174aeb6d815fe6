use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handler::user_handler::{
    forgot_password_handler, list_users_handler, login_handler, me_handler,
    resend_verification_handler, reset_password_handler, search_users_handler, signup_handler,
    update_me_handler, update_role_handler, verify_email_handler, verify_reset_otp_handler,
};
use crate::middlewares::auth_middleware::{authenticate, require_owner, require_staff, AuthState};
use crate::service::user_service::UserServiceImpl;

pub fn user_router(service: Arc<UserServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/verify-email", post(verify_email_handler))
        .route("/auth/resend-verification", post(resend_verification_handler))
        .route("/auth/forgot-password", post(forgot_password_handler))
        .route("/auth/verify-otp", post(verify_reset_otp_handler))
        .route("/auth/reset-password", post(reset_password_handler));

    let authed = Router::new()
        .route("/users/me", get(me_handler).patch(update_me_handler))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            authenticate,
        ));

    let staff = Router::new()
        .route("/users", get(list_users_handler))
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            authenticate,
        ));

    let owner = Router::new()
        .route("/users/search", get(search_users_handler))
        .route("/users/{id}/role", patch(update_role_handler))
        .route_layer(middleware::from_fn(require_owner))
        .route_layer(middleware::from_fn_with_state(auth_state, authenticate));

    public.merge(authed).merge(staff).merge(owner).with_state(service)
}
