use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::dto::user_dto::{
    ForgotPasswordRequest, LoginRequest, ResendVerificationRequest, ResetPasswordRequest,
    SignupRequest, UpdateMeRequest, UpdateRoleRequest, UserListQuery, UserSearchQuery,
    VerifyEmailRequest, VerifyOtpRequest,
};
use crate::handler::{parse_object_id, validate_payload};
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::HandlerError;
use crate::util::json::AppJson;

pub async fn signup_handler(
    State(service): State<Arc<UserServiceImpl>>,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let created = service.signup(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn verify_email_handler(
    State(service): State<Arc<UserServiceImpl>>,
    AppJson(payload): AppJson<VerifyEmailRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let result = service.verify_email(&payload.token).await?;
    Ok(Json(result))
}

pub async fn resend_verification_handler(
    State(service): State<Arc<UserServiceImpl>>,
    AppJson(payload): AppJson<ResendVerificationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let result = service.resend_verification(&payload.email).await?;
    Ok(Json(result))
}

pub async fn login_handler(
    State(service): State<Arc<UserServiceImpl>>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let result = service.login(&payload.email, &payload.password).await?;
    Ok(Json(result))
}

pub async fn forgot_password_handler(
    State(service): State<Arc<UserServiceImpl>>,
    AppJson(payload): AppJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let result = service.forgot_password(&payload.email).await?;
    Ok(Json(result))
}

pub async fn verify_reset_otp_handler(
    State(service): State<Arc<UserServiceImpl>>,
    AppJson(payload): AppJson<VerifyOtpRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let result = service.verify_reset_otp(&payload.email, &payload.otp).await?;
    Ok(Json(result))
}

pub async fn reset_password_handler(
    State(service): State<Arc<UserServiceImpl>>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let result = service
        .reset_password(&payload.email, &payload.otp, &payload.new_password)
        .await?;
    Ok(Json(result))
}

pub async fn me_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = service.me(&current.user_id).await?;
    Ok(Json(user))
}

pub async fn update_me_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    AppJson(payload): AppJson<UpdateMeRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let user = service.update_me(&current.user_id, payload).await?;
    Ok(Json(user))
}

// Owner only
pub async fn update_role_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(current): Extension<CurrentUser>,
    Path((id,)): Path<(String,)>,
    AppJson(payload): AppJson<UpdateRoleRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let target_id = parse_object_id(&id, "user")?;
    let user = service
        .update_role(&current.user_id, &target_id, &payload.role)
        .await?;
    Ok(Json(user))
}

// Owner only
pub async fn list_users_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let users = service.list(query.page, query.limit).await?;
    Ok(Json(users))
}

// Owner only
pub async fn search_users_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Query(query): Query<UserSearchQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let users = service.search(&query.q, query.limit).await?;
    Ok(Json(users))
}
