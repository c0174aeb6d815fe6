use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use bson::oid::ObjectId;

use crate::model::user::Role;
use crate::util::error::HandlerError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

/// Verified identity attached to the request after `authenticate`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: ObjectId,
    pub email: String,
    pub role: Role,
}

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

/// Validates the bearer token and stores a `CurrentUser` in the request
/// extensions. Every protected route runs through this.
pub async fn authenticate(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| HandlerError::unauthorized("Missing Authorization header"))?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| HandlerError::unauthorized("Malformed Authorization header"))?;
    let claims = state
        .jwt_utils
        .validate_token(&token)
        .map_err(|_| HandlerError::unauthorized("Invalid or expired token"))?;

    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| HandlerError::unauthorized("Invalid token subject"))?;
    let role = claims
        .role()
        .ok_or_else(|| HandlerError::unauthorized("Invalid token role"))?;

    req.extensions_mut().insert(CurrentUser {
        user_id,
        email: claims.email,
        role,
    });

    Ok(next.run(req).await)
}

/// Layered after `authenticate`; rejects non-staff callers.
pub async fn require_staff(req: Request<Body>, next: Next) -> Result<Response, HandlerError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| HandlerError::unauthorized("Not authenticated"))?;
    if !user.role.is_staff() {
        return Err(HandlerError::forbidden("Staff access required"));
    }
    Ok(next.run(req).await)
}

/// Layered after `authenticate`; rejects everyone but the owner.
pub async fn require_owner(req: Request<Body>, next: Next) -> Result<Response, HandlerError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| HandlerError::unauthorized("Not authenticated"))?;
    if !user.role.is_owner() {
        return Err(HandlerError::forbidden("Owner access required"));
    }
    Ok(next.run(req).await)
}
