pub mod app_conf;
pub mod mongo_conf;
pub mod jwt_conf;
pub mod email_conf;
pub mod checkout_conf;
pub mod verification_conf;
pub mod minio_conf;
pub mod owner_user_conf;

pub use mongo_conf::MongoConfig;
pub use jwt_conf::JwtConfig;
pub use email_conf::EmailConfig;
pub use checkout_conf::CheckoutConfig;
pub use verification_conf::VerificationConfig;
pub use minio_conf::MinioConfig;
pub use owner_user_conf::OwnerUserConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
