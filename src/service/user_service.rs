use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, instrument, warn};

use crate::config::{OwnerUserConfig, VerificationConfig};
use crate::dto::user_dto::{
    LoginResponse, MessageResponse, SignupRequest, SignupResponse, UpdateMeRequest, UserListResponse,
    UserResponse,
};
use crate::model::user::{ResetOtp, Role, RoleChangeLog, User};
use crate::repository::user_repo::UserRepository;
use crate::util::email::SmtpEmailService;
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

const LIST_LIMIT_CAP: u32 = 100;

#[async_trait]
pub trait UserService: Send + Sync {
    async fn signup(&self, request: SignupRequest) -> Result<SignupResponse, ServiceError>;
    async fn verify_email(&self, token: &str) -> Result<MessageResponse, ServiceError>;
    async fn resend_verification(&self, email: &str) -> Result<MessageResponse, ServiceError>;
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ServiceError>;
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ServiceError>;
    async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ServiceError>;
    async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ServiceError>;
    async fn me(&self, user_id: &ObjectId) -> Result<UserResponse, ServiceError>;
    async fn update_me(
        &self,
        user_id: &ObjectId,
        request: UpdateMeRequest,
    ) -> Result<UserResponse, ServiceError>;
    async fn update_role(
        &self,
        actor_id: &ObjectId,
        target_id: &ObjectId,
        role: &str,
    ) -> Result<UserResponse, ServiceError>;
    async fn list(&self, page: Option<u32>, limit: Option<u32>) -> Result<UserListResponse, ServiceError>;
    async fn search(&self, query: &str, limit: Option<u32>) -> Result<Vec<UserResponse>, ServiceError>;
    async fn create_owner_if_missing(&self, config: &OwnerUserConfig) -> Result<(), ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub email_service: Arc<SmtpEmailService>,
    pub verification_config: VerificationConfig,
}

impl UserServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        jwt_utils: Arc<JwtTokenUtilsImpl>,
        email_service: Arc<SmtpEmailService>,
        verification_config: VerificationConfig,
    ) -> Self {
        Self {
            user_repo,
            jwt_utils,
            email_service,
            verification_config,
        }
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn verify_link(&self, token: &str) -> String {
        format!(
            "{}/verify-email?token={}",
            self.verification_config.frontend_url.trim_end_matches('/'),
            token
        )
    }

    fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        let user_id = user.id.as_ref().map(|id| id.to_hex()).unwrap_or_default();
        self.jwt_utils
            .generate_token(&user_id, &user.email, user.role)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }

    /// Seconds left on the resend cooldown, zero when it has lapsed.
    fn resend_wait_secs(&self, last_sent_at: &Option<String>) -> i64 {
        let Some(last) = last_sent_at else { return 0 };
        let Ok(last) = DateTime::parse_from_rfc3339(last) else {
            return 0;
        };
        let elapsed = Utc::now().signed_duration_since(last.with_timezone(&Utc));
        (self.verification_config.resend_cooldown_secs - elapsed.num_seconds()).max(0)
    }

    fn otp_matches(user: &User, otp: &str) -> bool {
        let Some(ref reset) = user.reset_otp else {
            return false;
        };
        if reset.code != otp {
            return false;
        }
        match DateTime::parse_from_rfc3339(&reset.expires_at) {
            Ok(expires) => expires.with_timezone(&Utc) > Utc::now(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn signup(&self, request: SignupRequest) -> Result<SignupResponse, ServiceError> {
        info!("Registering new user");
        let email = Self::normalize_email(&request.email);
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        let mobile_number = request.mobile_number.trim().to_string();
        if self
            .user_repo
            .find_by_profile(&first_name, &last_name, &mobile_number)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(
                "An account with this name and mobile number already exists".to_string(),
            ));
        }

        let password_hash = PasswordUtilsImpl::hash_password(&request.password)
            .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))?;
        let token = PasswordUtilsImpl::generate_verification_token();
        let user = User {
            id: None,
            first_name,
            last_name,
            email: email.clone(),
            mobile_number,
            password_hash,
            role: Role::User,
            is_verified: false,
            verification_token: Some(token.clone()),
            verification_last_sent_at: Some(Utc::now().to_rfc3339()),
            verification_resend_count: 0,
            reset_otp: None,
            created_at: None,
            updated_at: None,
        };
        let inserted = self.user_repo.insert(user).await?;

        let link = self.verify_link(&token);
        if let Err(e) = self
            .email_service
            .send_verification_email(&inserted.email, &inserted.first_name, &link)
            .await
        {
            // The account exists either way; the user can ask for a resend.
            error!("Failed to send verification email: {}", e);
        }

        info!("User registered");
        Ok(SignupResponse {
            user: UserResponse::from(inserted),
            message: "Account created. Check your email to verify your address.".to_string(),
        })
    }

    #[instrument(skip(self, token))]
    async fn verify_email(&self, token: &str) -> Result<MessageResponse, ServiceError> {
        let user = self
            .user_repo
            .find_by_verification_token(token)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidInput("Invalid or expired verification token".to_string())
            })?;
        let id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("User without id".to_string()))?;
        let mut user = user;
        user.is_verified = true;
        user.verification_token = None;
        self.user_repo.update(id, user).await?;
        info!("Email verified");
        Ok(MessageResponse {
            message: "Email verified. You can log in now.".to_string(),
        })
    }

    #[instrument(skip(self), fields(email = %email))]
    async fn resend_verification(&self, email: &str) -> Result<MessageResponse, ServiceError> {
        let email = Self::normalize_email(email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No account with this email".to_string()))?;
        if user.is_verified {
            return Err(ServiceError::InvalidInput(
                "Email is already verified".to_string(),
            ));
        }

        let wait = self.resend_wait_secs(&user.verification_last_sent_at);
        if wait > 0 {
            return Err(ServiceError::RateLimited(format!(
                "Please wait {} seconds before requesting another email",
                wait
            )));
        }

        let id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("User without id".to_string()))?;
        let token = PasswordUtilsImpl::generate_verification_token();
        let mut user = user;
        user.verification_token = Some(token.clone());
        user.verification_last_sent_at = Some(Utc::now().to_rfc3339());
        user.verification_resend_count += 1;
        let user = self.user_repo.update(id, user).await?;

        let link = self.verify_link(&token);
        self.email_service
            .send_verification_email(&user.email, &user.first_name, &link)
            .await
            .map_err(|e| ServiceError::InternalError(format!("Email send error: {}", e)))?;

        info!("Verification email resent");
        Ok(MessageResponse {
            message: "Verification email sent.".to_string(),
        })
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        info!("User login attempt");
        let email = Self::normalize_email(email);
        // Missing account and wrong password answer identically.
        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            warn!("Login for unknown email");
            return Err(ServiceError::InvalidInput("Invalid credentials".to_string()));
        };
        let valid = PasswordUtilsImpl::verify_password(password, &user.password_hash)
            .map_err(|e| ServiceError::InternalError(format!("Password verify error: {}", e)))?;
        if !valid {
            warn!("Invalid credentials");
            return Err(ServiceError::InvalidInput("Invalid credentials".to_string()));
        }
        if !user.is_verified {
            return Err(ServiceError::Forbidden(
                "Email is not verified. Check your inbox or request a new link.".to_string(),
            ));
        }
        let token = self.issue_token(&user)?;
        info!("User logged in");
        Ok(LoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    #[instrument(skip(self), fields(email = %email))]
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ServiceError> {
        let email = Self::normalize_email(email);
        // Answer identically whether the account exists or not.
        let message = MessageResponse {
            message: "If an account exists for this email, a reset code has been sent.".to_string(),
        };
        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            info!("Password reset requested for unknown email");
            return Ok(message);
        };
        let id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("User without id".to_string()))?;

        let otp = PasswordUtilsImpl::generate_otp();
        let expires_at =
            (Utc::now() + Duration::minutes(self.verification_config.otp_ttl_minutes)).to_rfc3339();
        let mut user = user;
        user.reset_otp = Some(ResetOtp {
            code: otp.clone(),
            expires_at,
        });
        let user = self.user_repo.update(id, user).await?;

        self.email_service
            .send_password_reset_otp(&user.email, &otp, self.verification_config.otp_ttl_minutes)
            .await
            .map_err(|e| ServiceError::InternalError(format!("Email send error: {}", e)))?;

        info!("Password reset code sent");
        Ok(message)
    }

    #[instrument(skip(self, otp), fields(email = %email))]
    async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ServiceError> {
        let email = Self::normalize_email(email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::InvalidInput("Invalid or expired code".to_string()))?;
        if !Self::otp_matches(&user, otp) {
            return Err(ServiceError::InvalidInput("Invalid or expired code".to_string()));
        }
        Ok(MessageResponse {
            message: "Code verified.".to_string(),
        })
    }

    #[instrument(skip(self, otp, new_password), fields(email = %email))]
    async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ServiceError> {
        let email = Self::normalize_email(email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::InvalidInput("Invalid or expired code".to_string()))?;
        if !Self::otp_matches(&user, otp) {
            return Err(ServiceError::InvalidInput("Invalid or expired code".to_string()));
        }
        let id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("User without id".to_string()))?;

        let mut user = user;
        user.password_hash = PasswordUtilsImpl::hash_password(new_password)
            .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))?;
        user.reset_otp = None;
        self.user_repo.update(id, user).await?;

        info!("Password reset");
        Ok(MessageResponse {
            message: "Password updated. You can log in now.".to_string(),
        })
    }

    async fn me(&self, user_id: &ObjectId) -> Result<UserResponse, ServiceError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        Ok(UserResponse::from(user))
    }

    #[instrument(skip(self, request), fields(user = %user_id))]
    async fn update_me(
        &self,
        user_id: &ObjectId,
        request: UpdateMeRequest,
    ) -> Result<UserResponse, ServiceError> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        if let Some(first_name) = request.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(mobile_number) = request.mobile_number {
            user.mobile_number = mobile_number.trim().to_string();
        }
        let updated = self.user_repo.update(*user_id, user).await?;
        Ok(UserResponse::from(updated))
    }

    #[instrument(skip(self), fields(actor = %actor_id, target = %target_id, role = %role))]
    async fn update_role(
        &self,
        actor_id: &ObjectId,
        target_id: &ObjectId,
        role: &str,
    ) -> Result<UserResponse, ServiceError> {
        let new_role = Role::parse(role)
            .ok_or_else(|| ServiceError::InvalidInput(format!("Unknown role: {}", role)))?;
        if new_role == Role::Owner {
            return Err(ServiceError::InvalidInput(
                "The owner role cannot be assigned".to_string(),
            ));
        }
        let mut target = self
            .user_repo
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        if target.role == Role::Owner {
            return Err(ServiceError::Forbidden(
                "The owner account's role cannot be changed".to_string(),
            ));
        }
        if target.role == new_role {
            return Ok(UserResponse::from(target));
        }

        let from_role = target.role;
        target.role = new_role;
        let updated = self.user_repo.update(*target_id, target).await?;

        self.user_repo
            .insert_role_change(RoleChangeLog {
                id: None,
                user: *target_id,
                changed_by: *actor_id,
                from_role,
                to_role: new_role,
                created_at: None,
            })
            .await?;

        info!("Role updated");
        Ok(UserResponse::from(updated))
    }

    async fn list(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<UserListResponse, ServiceError> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(20).clamp(1, LIST_LIMIT_CAP);
        let users = self.user_repo.list(page, limit).await?;
        let total = self.user_repo.count().await?;
        Ok(UserListResponse {
            users: users.into_iter().map(UserResponse::from).collect(),
            total,
            page,
            limit,
        })
    }

    async fn search(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<UserResponse>, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Search query must not be empty".to_string(),
            ));
        }
        let limit = limit.unwrap_or(20).clamp(1, LIST_LIMIT_CAP);
        let users = self.user_repo.search(query, limit).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    #[instrument(skip(self, config), fields(email = %config.email))]
    async fn create_owner_if_missing(&self, config: &OwnerUserConfig) -> Result<(), ServiceError> {
        if self.user_repo.count_by_role(Role::Owner).await? > 0 {
            return Ok(());
        }
        let email = Self::normalize_email(&config.email);
        if let Some(existing) = self.user_repo.find_by_email(&email).await? {
            // Promote an existing account rather than failing startup.
            let id = existing
                .id
                .ok_or_else(|| ServiceError::InternalError("User without id".to_string()))?;
            let mut existing = existing;
            existing.role = Role::Owner;
            existing.is_verified = true;
            self.user_repo.update(id, existing).await?;
            info!("Existing account promoted to owner");
            return Ok(());
        }

        let password_hash = PasswordUtilsImpl::hash_password(&config.password)
            .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))?;
        let owner = User {
            id: None,
            first_name: config.first_name.clone(),
            last_name: config.last_name.clone(),
            email,
            mobile_number: config.mobile_number.clone(),
            password_hash,
            role: Role::Owner,
            is_verified: true,
            verification_token: None,
            verification_last_sent_at: None,
            verification_resend_count: 0,
            reset_otp: None,
            created_at: None,
            updated_at: None,
        };
        self.user_repo.insert(owner).await?;
        info!("Owner account created");
        Ok(())
    }
}
